use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 抓取失败（已转换为错误记录的抓取结果）
    #[error("抓取失败: {0}")]
    Scrape(String),
    /// 分析错误
    #[error("分析错误: {0}")]
    Analysis(#[from] AnalysisError),
    /// 报告生成错误
    #[error("报告错误: {0}")]
    Report(#[from] ReportError),
    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 创建页面失败
    #[error("创建页面失败: {source}")]
    PageCreationFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptExecutionFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 脚本返回值无法解析
    #[error("脚本返回值无法解析: {0}")]
    ScriptResultInvalid(String),
    /// 读取页面内容失败
    #[error("读取页面内容失败: {source}")]
    ContentReadFailed {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// URL 不合法
    #[error("无效的 URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// 单项分析错误
///
/// 每个子分析独立返回该错误，由分析器降级为占位结果
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 模型调用失败
    #[error("模型调用失败 (模型: {model}): {reason}")]
    ModelCallFailed { model: String, reason: String },
    /// 模型返回内容无法解析
    #[error("无法解析模型返回内容 ({response}): {reason}")]
    InvalidModelOutput { response: String, reason: String },
    /// 主题模型无法拟合
    #[error("主题建模失败: {0}")]
    TopicModel(String),
}

/// 报告生成错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// PDF 内容流编码失败
    #[error("PDF 内容编码失败: {0}")]
    Encode(String),
    /// PDF 序列化失败
    #[error("PDF 序列化失败: {0}")]
    Serialize(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML 解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AnalysisError {
    /// 创建模型调用失败错误
    pub fn model_failed(model: impl Into<String>, reason: impl ToString) -> Self {
        AnalysisError::ModelCallFailed {
            model: model.into(),
            reason: reason.to_string(),
        }
    }

    /// 创建模型输出解析失败错误
    pub fn invalid_output(response: impl Into<String>, reason: impl ToString) -> Self {
        AnalysisError::InvalidModelOutput {
            response: response.into(),
            reason: reason.to_string(),
        }
    }
}

impl AppError {
    /// 创建文件读写错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

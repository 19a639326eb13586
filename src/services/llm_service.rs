//! LLM 服务 - 业务能力层
//!
//! 只负责"调用模型"能力，不关心分析流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, 本地推理服务等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::AnalysisError;

/// LLM 服务
///
/// 职责：
/// - 持有唯一的模型客户端，启动时创建一次
/// - 提供通用的 LLM 调用接口
/// - 不认识 PageRecord / AnalysisResult
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// 其他所有模型能力（摘要、情感、分类）都基于此函数。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, AnalysisError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let model_err = |e: &dyn std::fmt::Display| AnalysisError::model_failed(&self.model_name, e);

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| model_err(&e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| model_err(&e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 低温度，尽量保证同一输入得到稳定输出
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(512u32)
            .build()
            .map_err(|e| model_err(&e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            model_err(&e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| model_err(&"LLM 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 调用 LLM 并把回复解析为 JSON
    pub async fn send_for_json<T: DeserializeOwned>(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<T, AnalysisError> {
        let reply = self.send_to_llm(user_message, system_message).await?;
        parse_json_reply(&reply)
    }
}

/// 解析模型返回的 JSON，容忍 ```json 代码块包裹
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, AnalysisError> {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|e| AnalysisError::invalid_output(reply, e))
}

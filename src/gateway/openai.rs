//! OpenAI implementation of the AI gateway.

use super::{file_name_for_mime, join_context, AiGateway};
use crate::config::{AiSettings, Prompts};
use crate::error::{AuditoriumError, Result};
use crate::openai::create_client;
use async_openai::types::{
    AudioInput, AudioResponseFormat, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateEmbeddingRequestArgs, CreateTranscriptionRequestArgs,
    EmbeddingInput,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Gateway backed by the OpenAI API.
pub struct OpenAIGateway {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    transcription_model: String,
    embedding_model: String,
    dimensions: u32,
    answer_model: String,
    temperature: f32,
    prompts: Prompts,
}

impl OpenAIGateway {
    /// Create a gateway from settings and prompt templates.
    pub fn new(settings: &AiSettings, prompts: Prompts) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            transcription_model: settings.transcription_model.clone(),
            embedding_model: settings.embedding_model.clone(),
            dimensions: settings.embedding_dimensions,
            answer_model: settings.answer_model.clone(),
            temperature: settings.answer_temperature,
            prompts,
        })
    }
}

#[async_trait]
impl AiGateway for OpenAIGateway {
    #[instrument(skip(self, audio), fields(bytes = audio.len()))]
    async fn transcribe(&self, audio: &[u8], mime_type: &str) -> Result<String> {
        debug!("Transcribing audio with {}", self.transcription_model);

        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name_for_mime(mime_type), audio.to_vec()))
            .model(&self.transcription_model)
            .prompt(self.prompts.transcription.instruction.clone())
            .response_format(AudioResponseFormat::Json)
            .build()
            .map_err(|e| {
                AuditoriumError::TranscriptionFailed(format!("Failed to build request: {}", e))
            })?;

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| AuditoriumError::TranscriptionFailed(format!("Transcription API error: {}", e)))?;

        let text = response.text.trim();
        if text.is_empty() {
            return Err(AuditoriumError::TranscriptionFailed(
                "Could not convert the audio to text".to_string(),
            ));
        }

        debug!("Transcribed {} characters", text.len());
        Ok(text.to_string())
    }

    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(EmbeddingInput::String(text.to_string()))
            .dimensions(self.dimensions)
            .build()
            .map_err(|e| {
                AuditoriumError::EmbeddingFailed(format!("Failed to build request: {}", e))
            })?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| AuditoriumError::EmbeddingFailed(format!("Embedding API error: {}", e)))?;

        response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or_else(|| {
                AuditoriumError::EmbeddingFailed("Empty embedding response".to_string())
            })
    }

    #[instrument(skip(self, contexts), fields(question = %question, contexts = contexts.len()))]
    async fn generate_answer(&self, question: &str, contexts: &[String]) -> Result<String> {
        let user_prompt = self.prompts.render_answer(question, &join_context(contexts));

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.answer.system.clone())
                .build()
                .map_err(|e| AuditoriumError::AnswerGenerationFailed(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| AuditoriumError::AnswerGenerationFailed(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.answer_model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| AuditoriumError::AnswerGenerationFailed(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AuditoriumError::AnswerGenerationFailed(format!("Chat API error: {}", e)))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|answer| !answer.trim().is_empty())
            .ok_or_else(|| {
                AuditoriumError::AnswerGenerationFailed("Empty response from LLM".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Serve `router` on an ephemeral port and point the settings at it.
    async fn stub_provider(router: Router) -> AiSettings {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        AiSettings {
            api_key: Some("sk-test".to_string()),
            api_base: Some(format!("http://{}", addr)),
            timeout_seconds: 5,
            ..AiSettings::default()
        }
    }

    async fn gateway_for(router: Router) -> OpenAIGateway {
        let settings = stub_provider(router).await;
        OpenAIGateway::new(&settings, Prompts::default()).unwrap()
    }

    fn chat_response(content: Value) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 0,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    fn embedding_response(data: Value) -> Value {
        json!({
            "object": "list",
            "model": "text-embedding-3-small",
            "data": data,
            "usage": { "prompt_tokens": 1, "total_tokens": 1 }
        })
    }

    /// A non-retryable provider error.
    fn provider_error() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": { "message": "upstream rejected the request", "type": "invalid_request_error" }
            })),
        )
    }

    #[test]
    fn test_gateway_creation() {
        let settings = AiSettings {
            api_key: Some("sk-test".to_string()),
            embedding_dimensions: 256,
            ..AiSettings::default()
        };

        let gateway = OpenAIGateway::new(&settings, Prompts::default()).unwrap();
        assert_eq!(gateway.dimensions, 256);
        assert_eq!(gateway.answer_model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_transcribe_returns_trimmed_text() {
        let gateway = gateway_for(Router::new().route(
            "/audio/transcriptions",
            post(|| async { Json(json!({ "text": "  Hello, class.\n" })) }),
        ))
        .await;

        let text = gateway.transcribe(b"fake-audio", "audio/webm").await.unwrap();
        assert_eq!(text, "Hello, class.");
    }

    #[tokio::test]
    async fn test_blank_transcript_fails() {
        let gateway = gateway_for(Router::new().route(
            "/audio/transcriptions",
            post(|| async { Json(json!({ "text": "   " })) }),
        ))
        .await;

        let err = gateway.transcribe(b"fake-audio", "audio/webm").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::TranscriptionFailed(_)));
    }

    #[tokio::test]
    async fn test_transcription_provider_error_is_typed() {
        let gateway = gateway_for(
            Router::new().route("/audio/transcriptions", post(|| async { provider_error() })),
        )
        .await;

        let err = gateway.transcribe(b"fake-audio", "audio/mpeg").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::TranscriptionFailed(_)));
        assert!(err.to_string().contains("upstream rejected the request"));
    }

    #[tokio::test]
    async fn test_embed_returns_vector() {
        let gateway = gateway_for(Router::new().route(
            "/embeddings",
            post(|| async {
                Json(embedding_response(json!([
                    { "index": 0, "object": "embedding", "embedding": [0.25, 0.75] }
                ])))
            }),
        ))
        .await;

        assert_eq!(gateway.embed("text").await.unwrap(), vec![0.25, 0.75]);
    }

    #[tokio::test]
    async fn test_missing_or_empty_embedding_fails() {
        let gateway = gateway_for(Router::new().route(
            "/embeddings",
            post(|| async { Json(embedding_response(json!([]))) }),
        ))
        .await;
        let err = gateway.embed("text").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::EmbeddingFailed(_)));

        let gateway = gateway_for(Router::new().route(
            "/embeddings",
            post(|| async {
                Json(embedding_response(json!([
                    { "index": 0, "object": "embedding", "embedding": [] }
                ])))
            }),
        ))
        .await;
        let err = gateway.embed("text").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::EmbeddingFailed(_)));
    }

    #[tokio::test]
    async fn test_embedding_provider_error_is_typed() {
        let gateway =
            gateway_for(Router::new().route("/embeddings", post(|| async { provider_error() }))).await;

        let err = gateway.embed("text").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::EmbeddingFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_answer_fails() {
        for content in [Value::Null, json!("   ")] {
            let gateway = gateway_for(Router::new().route(
                "/chat/completions",
                post(move || {
                    let body = chat_response(content.clone());
                    async move { Json(body) }
                }),
            ))
            .await;

            let err = gateway.generate_answer("Why?", &[]).await.unwrap_err();
            assert!(matches!(err, AuditoriumError::AnswerGenerationFailed(_)));
        }
    }

    #[tokio::test]
    async fn test_chat_provider_error_is_typed() {
        let gateway = gateway_for(
            Router::new().route("/chat/completions", post(|| async { provider_error() })),
        )
        .await;

        let err = gateway.generate_answer("Why?", &[]).await.unwrap_err();
        assert!(matches!(err, AuditoriumError::AnswerGenerationFailed(_)));
    }

    #[tokio::test]
    async fn test_answer_prompt_carries_joined_context() {
        let captured: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));

        let router = Router::new()
            .route(
                "/chat/completions",
                post(
                    |State(captured): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *captured.lock().unwrap() = Some(body);
                        Json(chat_response(json!("Drizzle is an ORM.")))
                    },
                ),
            )
            .with_state(captured.clone());
        let gateway = gateway_for(router).await;

        let contexts = vec![
            "Drizzle is an ORM.".to_string(),
            "It targets TypeScript.".to_string(),
        ];
        let answer = gateway.generate_answer("What is Drizzle?", &contexts).await.unwrap();
        assert_eq!(answer, "Drizzle is an ORM.");

        let body = captured.lock().unwrap().take().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");

        let user = messages[1]["content"].as_str().unwrap();
        assert!(user.contains("CONTEXT:\nDrizzle is an ORM.\n\nIt targets TypeScript.\n"));
        assert!(user.contains("QUESTION:\nWhat is Drizzle?"));
    }
}

//! Question answering over a room's transcripts.

use crate::error::{AuditoriumError, Result};
use crate::gateway::AiGateway;
use crate::rag::context::transcripts;
use crate::rag::ContextBuilder;
use crate::store::{AudioChunkStore, NewQuestion, Question, QuestionStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Result of asking a question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedQuestion {
    pub question_id: Uuid,
    pub answer: String,
}

/// Lists questions and answers new ones from retrieved transcripts.
#[derive(Clone)]
pub struct QuestionService {
    questions: Arc<dyn QuestionStore>,
    context: Arc<ContextBuilder>,
    gateway: Arc<dyn AiGateway>,
}

impl QuestionService {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        chunks: Arc<dyn AudioChunkStore>,
        gateway: Arc<dyn AiGateway>,
        max_context_chunks: usize,
    ) -> Self {
        let context = ContextBuilder::new(chunks, gateway.clone()).with_max_chunks(max_context_chunks);
        Self {
            questions,
            context: Arc::new(context),
            gateway,
        }
    }

    /// Questions of a room, newest first. An unknown room has none.
    pub async fn list_questions(&self, room_id: Uuid) -> Result<Vec<Question>> {
        self.questions.list_questions(room_id).await
    }

    /// Answer `question` from the room's nearest transcripts and store both.
    ///
    /// Empty question text is not rejected; it is embedded and answered like
    /// any other.
    #[instrument(skip(self, question))]
    pub async fn create_question(&self, room_id: Uuid, question: &str) -> Result<CreatedQuestion> {
        let context = self.context.build(room_id, question).await?;
        let answer = self
            .gateway
            .generate_answer(question, &transcripts(&context))
            .await?;

        let created = self
            .questions
            .create_question(&NewQuestion {
                room_id,
                question: question.to_string(),
                answer: Some(answer.clone()),
            })
            .await?
            .ok_or(AuditoriumError::QuestionCreationFailed)?;

        info!(
            "Answered question {} with {} context chunks",
            created.id,
            context.len()
        );

        Ok(CreatedQuestion {
            question_id: created.id,
            answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::gateway::{GatewayCall, ScriptedGateway};
    use crate::store::{MemoryStore, NewAudioChunk, NewRoom, RoomStore};
    use async_trait::async_trait;

    struct NoRowStore;

    #[async_trait]
    impl QuestionStore for NoRowStore {
        async fn create_question(&self, _question: &NewQuestion) -> Result<Option<Question>> {
            Ok(None)
        }

        async fn list_questions(&self, _room_id: Uuid) -> Result<Vec<Question>> {
            Ok(Vec::new())
        }
    }

    async fn setup(gateway: ScriptedGateway) -> (Arc<MemoryStore>, Arc<ScriptedGateway>, QuestionService, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let service = QuestionService::new(store.clone(), store.clone(), gateway.clone(), 3);
        let room = store.create_room(&NewRoom::new("Sala A", None)).await.unwrap().unwrap();
        (store, gateway, service, room.id)
    }

    #[tokio::test]
    async fn test_answer_is_stored_and_listed() {
        let (_store, _gateway, service, room_id) =
            setup(ScriptedGateway::new("unused", "Answer")).await;

        let created = service.create_question(room_id, "What is X?").await.unwrap();
        assert_eq!(created.answer, "Answer");

        let questions = service.list_questions(room_id).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, created.question_id);
        assert_eq!(questions[0].question, "What is X?");
        assert_eq!(questions[0].answer.as_deref(), Some("Answer"));
    }

    #[tokio::test]
    async fn test_empty_question_still_reaches_gateway() {
        let (_store, gateway, service, room_id) =
            setup(ScriptedGateway::new("unused", "Mocked")).await;

        let created = service.create_question(room_id, "").await.unwrap();
        assert_eq!(created.answer, "Mocked");
        assert!(gateway.calls().contains(&GatewayCall::GenerateAnswer {
            question: String::new(),
            contexts: Vec::new(),
        }));
    }

    #[tokio::test]
    async fn test_nearest_transcript_comes_first() {
        let (store, gateway, service, room_id) = setup(
            ScriptedGateway::new("unused", "Answer").with_embedding("What is X?", vec![0.9, 0.1]),
        )
        .await;

        for (text, embedding) in [("about Y", vec![0.0, 1.0]), ("about X", vec![1.0, 0.0])] {
            store
                .create_chunk(&NewAudioChunk {
                    room_id,
                    transcription: text.to_string(),
                    embedding,
                })
                .await
                .unwrap();
        }

        service.create_question(room_id, "What is X?").await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::Embed { text: "What is X?".to_string() },
                GatewayCall::GenerateAnswer {
                    question: "What is X?".to_string(),
                    contexts: vec!["about X".to_string(), "about Y".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_answer_failure_stores_nothing() {
        let (_store, _gateway, service, room_id) =
            setup(ScriptedGateway::new("unused", "x").without_answer()).await;

        let err = service.create_question(room_id, "Why?").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamAi);
        assert!(service.list_questions(room_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_inserted_row() {
        let store = Arc::new(MemoryStore::new());
        let service = QuestionService::new(
            Arc::new(NoRowStore),
            store,
            Arc::new(ScriptedGateway::new("unused", "Answer")),
            3,
        );

        let err = service.create_question(Uuid::new_v4(), "Why?").await.unwrap_err();
        assert!(matches!(err, AuditoriumError::QuestionCreationFailed));
    }

    #[tokio::test]
    async fn test_unknown_room_lists_nothing() {
        let (_store, _gateway, service, _room_id) =
            setup(ScriptedGateway::new("unused", "Answer")).await;

        assert!(service.list_questions(Uuid::new_v4()).await.unwrap().is_empty());
    }
}

use super::*;
use async_trait::async_trait;
use dbchat_core::service::{TurnReply, TurnRequest};
use dbchat_core::session::ResultPage;
use std::sync::Mutex;

fn answered_turn(nl: &str, query: &str) -> MessageTurn {
    MessageTurn::from_parts(
        Uuid::new_v4(),
        nl.to_string(),
        None,
        None,
        Some(query.to_string()),
        None,
        None,
        Some(one_user_page(0)),
        None,
    )
}

fn one_user_page(page: u32) -> ResultPage {
    ResultPage {
        column_names: vec!["id".into(), "name".into()],
        rows: vec![vec!["1".into(), "alice".into()]],
        page,
        page_size: 10,
        total_count: 1,
    }
}

/// In-memory stand-in for the whole backend: session CRUD, canned query
/// generation, console echo and fabricated data pages.
struct FakeBackend {
    chats: Mutex<Vec<(ChatSession, Vec<MessageTurn>)>>,
    console_queries: Mutex<Vec<(String, u32)>>,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            chats: Mutex::new(Vec::new()),
            console_queries: Mutex::new(Vec::new()),
        }
    }

    fn with_chats(chats: Vec<(ChatSession, Vec<MessageTurn>)>) -> Self {
        Self {
            chats: Mutex::new(chats),
            console_queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SessionService for FakeBackend {
    async fn list(&self, _data_source_id: Uuid) -> Result<Vec<ChatSession>> {
        Ok(self
            .chats
            .lock()
            .unwrap()
            .iter()
            .map(|(s, _)| s.clone())
            .collect())
    }

    async fn create(&self, _data_source_id: Uuid) -> Result<ChatSession> {
        let session = ChatSession::new(Uuid::new_v4(), "New chat");
        self.chats
            .lock()
            .unwrap()
            .push((session.clone(), Vec::new()));
        Ok(session)
    }

    async fn rename(&self, session_id: Uuid, name: &str) -> Result<()> {
        let mut chats = self.chats.lock().unwrap();
        let (session, _) = chats
            .iter_mut()
            .find(|(s, _)| s.id == session_id)
            .ok_or_else(|| DbChatError::not_found("Chat", session_id.to_string()))?;
        session.name = name.to_string();
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<()> {
        self.chats.lock().unwrap().retain(|(s, _)| s.id != session_id);
        Ok(())
    }

    async fn transcript(&self, session_id: Uuid) -> Result<ChatTranscript> {
        let chats = self.chats.lock().unwrap();
        let (_, messages) = chats
            .iter()
            .find(|(s, _)| s.id == session_id)
            .ok_or_else(|| DbChatError::not_found("Chat", session_id.to_string()))?;
        Ok(ChatTranscript {
            session_id,
            messages: messages.clone(),
            loading: false,
        })
    }
}

#[async_trait]
impl QueryService for FakeBackend {
    async fn submit(&self, _data_source_id: Uuid, request: TurnRequest) -> Result<TurnReply> {
        let first_turn = request.prior_turns.is_empty();
        Ok(TurnReply {
            turn: MessageTurn::from_parts(
                Uuid::new_v4(),
                request.text,
                None,
                Some("All rows of the user table.".to_string()),
                Some("SELECT * FROM public.user;".to_string()),
                None,
                None,
                Some(one_user_page(0)),
                None,
            ),
            session_name: first_turn.then(|| "All users".to_string()),
        })
    }
}

#[async_trait]
impl ConsoleService for FakeBackend {
    async fn execute(
        &self,
        _data_source_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        self.console_queries
            .lock()
            .unwrap()
            .push((query.to_string(), page));
        Ok(ConsoleOutcome::Success {
            executed_query: query.to_string(),
            data: ResultPage {
                column_names: vec!["?column?".into()],
                rows: vec![vec!["1".into()]],
                page,
                page_size,
                total_count: 1,
            },
        })
    }
}

#[async_trait]
impl MessageDataService for FakeBackend {
    async fn fetch(&self, _message_id: Uuid, page: u32, _page_size: u32) -> Result<ResultPage> {
        Ok(one_user_page(page))
    }
}

fn controller(backend: Arc<FakeBackend>) -> SessionController {
    SessionController::new(
        ClientConfig::default(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend,
    )
}

#[tokio::test]
async fn operations_require_a_selected_data_source() {
    let controller = controller(Arc::new(FakeBackend::new()));

    assert!(controller.create_session().await.unwrap_err().is_validation());
    assert!(
        controller
            .submit_natural_language_turn("hi", QueryModel::new("gpt-4o"))
            .await
            .unwrap_err()
            .is_validation()
    );
    assert!(
        controller
            .run_console_query("SELECT 1", 10)
            .await
            .unwrap_err()
            .is_validation()
    );
}

#[tokio::test]
async fn first_turn_round_trip_fills_transcript_and_renames_session() {
    let controller = controller(Arc::new(FakeBackend::new()));
    let ds = Uuid::new_v4();

    let sessions = controller.select_data_source(ds).await.unwrap();
    assert!(sessions.is_empty());
    assert!(controller.transcript().await.is_none());

    let session = controller.create_session().await.unwrap();
    assert_eq!(session.name, "New chat");

    let turn = controller
        .submit_natural_language_turn("find me all users", QueryModel::new("gpt-4o"))
        .await
        .unwrap();
    assert_eq!(turn.generated_query(), Some("SELECT * FROM public.user;"));

    let transcript = controller.transcript().await.unwrap();
    assert_eq!(transcript.session_id, session.id);
    let last = transcript.messages.last().unwrap();
    assert_eq!(last.natural_language_query, "find me all users");
    assert_eq!(last.generated_query(), Some("SELECT * FROM public.user;"));
    assert_eq!(last.data().unwrap().rows, vec![vec!["1", "alice"]]);

    assert_eq!(controller.active_session().await.unwrap().name, "All users");
}

#[tokio::test]
async fn selecting_a_data_source_loads_the_first_session_transcript() {
    let first = ChatSession::new(Uuid::new_v4(), "Users");
    let backend = Arc::new(FakeBackend::with_chats(vec![
        (
            first.clone(),
            vec![answered_turn("all users", "SELECT * FROM public.user;")],
        ),
        (ChatSession::new(Uuid::new_v4(), "Orders"), Vec::new()),
    ]));
    let controller = controller(backend);

    controller.select_data_source(Uuid::new_v4()).await.unwrap();

    let transcript = controller.transcript().await.unwrap();
    assert_eq!(transcript.session_id, first.id);
    assert_eq!(transcript.messages.len(), 1);
}

#[tokio::test]
async fn deleting_the_active_session_loads_the_neighbor_transcript() {
    let first = ChatSession::new(Uuid::new_v4(), "Users");
    let second = ChatSession::new(Uuid::new_v4(), "Orders");
    let backend = Arc::new(FakeBackend::with_chats(vec![
        (
            first.clone(),
            vec![answered_turn("all users", "SELECT * FROM public.user;")],
        ),
        (second.clone(), Vec::new()),
    ]));
    let controller = controller(backend);

    controller.select_data_source(Uuid::new_v4()).await.unwrap();
    controller.select_session(1).await.unwrap();
    assert_eq!(controller.transcript().await.unwrap().session_id, second.id);

    let outcome = controller.delete_session(second.id).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::ActiveMoved(first.clone()));

    let transcript = controller.transcript().await.unwrap();
    assert_eq!(transcript.session_id, first.id);
    assert_eq!(transcript.messages.len(), 1);
}

#[tokio::test]
async fn deleting_the_only_session_clears_the_transcript() {
    let only = ChatSession::new(Uuid::new_v4(), "Users");
    let backend = Arc::new(FakeBackend::with_chats(vec![(only.clone(), Vec::new())]));
    let controller = controller(backend);

    controller.select_data_source(Uuid::new_v4()).await.unwrap();
    let outcome = controller.delete_session(only.id).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Cleared);
    assert!(controller.transcript().await.is_none());
    assert!(controller.active_session().await.is_none());
}

#[tokio::test]
async fn loading_the_same_session_twice_is_idempotent() {
    let session = ChatSession::new(Uuid::new_v4(), "Users");
    let backend = Arc::new(FakeBackend::with_chats(vec![(
        session.clone(),
        vec![answered_turn("all users", "SELECT * FROM public.user;")],
    )]));
    let controller = controller(backend);
    controller.select_data_source(Uuid::new_v4()).await.unwrap();

    let first_load = controller.select_session(0).await.unwrap();
    let second_load = controller.select_session(0).await.unwrap();

    assert_eq!(first_load, second_load);
    assert_eq!(controller.transcript().await.unwrap(), second_load);
}

#[tokio::test]
async fn load_more_turn_data_replaces_only_the_cached_page() {
    let controller = controller(Arc::new(FakeBackend::new()));
    controller.select_data_source(Uuid::new_v4()).await.unwrap();
    controller.create_session().await.unwrap();
    let turn = controller
        .submit_natural_language_turn("find me all users", QueryModel::new("gpt-4o"))
        .await
        .unwrap();
    assert_eq!(turn.data().unwrap().page, 0);

    let applied = controller
        .load_more_turn_data(turn.message_id, 2, 10)
        .await
        .unwrap();
    assert!(applied);

    let transcript = controller.transcript().await.unwrap();
    let reloaded = &transcript.messages[0];
    assert_eq!(reloaded.data().unwrap().page, 2);
    assert_eq!(reloaded.natural_language_query, "find me all users");
    assert_eq!(
        reloaded.generated_query(),
        Some("SELECT * FROM public.user;")
    );
}

#[tokio::test]
async fn console_pagination_reissues_the_executed_query() {
    let backend = Arc::new(FakeBackend::new());
    let controller = controller(backend.clone());
    controller.select_data_source(Uuid::new_v4()).await.unwrap();

    controller.run_console_query("SELECT 1", 10).await.unwrap();
    controller.change_console_page(3, 10).await.unwrap();

    let queries = backend.console_queries.lock().unwrap();
    assert_eq!(
        *queries,
        vec![("SELECT 1".to_string(), 0), ("SELECT 1".to_string(), 3)]
    );
}

#[tokio::test]
async fn blank_rename_is_rejected_locally() {
    let session = ChatSession::new(Uuid::new_v4(), "Users");
    let backend = Arc::new(FakeBackend::with_chats(vec![(session.clone(), Vec::new())]));
    let controller = controller(backend);
    controller.select_data_source(Uuid::new_v4()).await.unwrap();

    let err = controller
        .rename_session(session.id, "   ")
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(controller.sessions().await[0].name, "Users");
}

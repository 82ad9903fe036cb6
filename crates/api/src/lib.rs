pub mod builder;
pub mod composer;
pub mod distractor;
pub mod error;
pub mod fetch;
pub mod query;
pub mod reply;
pub mod score;
pub mod wiki;

#[cfg(test)]
mod stub;

use http_body_util::{BodyExt, Limited};
use hyper::{body::Body, Method, Request, StatusCode};
use model::{
    wiki::{SearchHit, SearchResults, Summary},
    QuizResult,
};
use rand::{rngs::StdRng, SeedableRng};
use reply::{Rejection, Reply};
use score::ScoreStore;
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;

pub use fetch::{Fetch, HttpFetcher};
pub use wiki::Wiki;

/// Score submissions are tiny; anything larger is refused outright.
const MAX_BODY_BYTES: usize = 4 * 1024;

const MISSING_QUERY: Rejection = Rejection::bad_request("Parâmetro q é obrigatório");
const MISSING_TITLE: Rejection = Rejection::bad_request("Parâmetro title é obrigatório");
const BAD_SCORE: Rejection = Rejection::bad_request("Informe { user, score:number }");
const NO_QUESTIONS: Rejection =
    Rejection::new(StatusCode::NOT_FOUND, "Não foi possível gerar perguntas.");

#[derive(Serialize)]
struct SearchBody<'a> {
    query: &'a str,
    results: Vec<SearchHit>,
}

#[derive(Serialize)]
struct SummaryBody<'a> {
    title: &'a str,
    description: &'a str,
    extract: &'a str,
    content_urls: Option<&'a Value>,
}

/// Request router over a Wikipedia gateway and a score store.
pub struct App<F, S> {
    wiki: Wiki<F>,
    store: S,
}

impl<F, S> App<F, S> {
    pub fn new(wiki: Wiki<F>, store: S) -> Self {
        Self { wiki, store }
    }
}

impl<F: Fetch, S: ScoreStore> App<F, S> {
    pub async fn respond<B>(&self, req: Request<B>) -> Reply
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = String::from(req.uri().path());
        match self.try_respond(req).await {
            Ok(res) => res,
            Err(rejection) => {
                log::debug!("{method} {path} rejected with {}", rejection.status);
                rejection.into_response()
            }
        }
    }

    pub async fn try_respond<B>(&self, req: Request<B>) -> Result<Reply, Rejection>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let query = parts.uri.query().unwrap_or_default();
        match (&parts.method, parts.uri.path()) {
            (&Method::OPTIONS, _) => Ok(reply::preflight()),
            (&Method::GET, "/search") => self.on_search(query).await,
            (&Method::GET, "/summary") => self.on_summary(query).await,
            (&Method::GET, "/quiz") => self.on_quiz(query).await,
            (&Method::GET, "/quiz-sustentabilidade") => self.on_sustainability_quiz(query).await,
            (&Method::POST, "/score") => self.on_score(body).await,
            _ => Err(Rejection::NOT_FOUND),
        }
    }

    async fn on_search(&self, query: &str) -> Result<Reply, Rejection> {
        const FAILED: Rejection = Rejection::internal("Erro ao buscar na Wikipédia");
        let q = query::required(query, "q").ok_or(MISSING_QUERY)?;

        let upstream = self.wiki.fetch_search(&q).await.map_err(|err| {
            log::error!("search for {q:?} failed: {err}");
            FAILED
        })?;
        let results: SearchResults = wiki::decode(&upstream).map_err(|err| {
            log::error!("search for {q:?} returned garbage: {err}");
            FAILED
        })?;

        reply::json(&SearchBody { query: &q, results: results.into_hits() }, FAILED)
    }

    async fn on_summary(&self, query: &str) -> Result<Reply, Rejection> {
        const FAILED: Rejection = Rejection::internal("Erro ao obter resumo da Wikipédia");
        let title = query::required(query, "title").ok_or(MISSING_TITLE)?;

        let upstream = self.wiki.fetch_summary(&title).await.map_err(|err| {
            log::error!("summary of {title:?} failed: {err}");
            FAILED
        })?;
        if !upstream.is_success() {
            return Err(Rejection::new(upstream.status, "Página não encontrada na Wikipédia"));
        }

        let summary: Summary<Value> = wiki::decode(&upstream).map_err(|err| {
            log::error!("summary of {title:?} returned garbage: {err}");
            FAILED
        })?;
        let body = SummaryBody {
            title: &summary.title,
            description: summary.description.as_deref().unwrap_or_default(),
            extract: summary.extract.as_deref().unwrap_or_default(),
            content_urls: summary.content_urls.as_ref(),
        };
        reply::json(&body, FAILED)
    }

    async fn on_quiz(&self, query: &str) -> Result<Reply, Rejection> {
        const FAILED: Rejection = Rejection::internal("Erro ao gerar quiz pela Wikipédia");
        let title = query::required(query, "title").ok_or(MISSING_TITLE)?;
        let n = query::count(query, composer::MAX_QUESTIONS);

        let mut rng = StdRng::from_entropy();
        let questions = composer::compose(&self.wiki, &title, n, &mut rng).await;
        if questions.is_empty() {
            return Err(NO_QUESTIONS);
        }

        log::info!("serving {} question(s) about {title:?}", questions.len());
        reply::json(&QuizResult::new(title, questions), FAILED)
    }

    async fn on_sustainability_quiz(&self, query: &str) -> Result<Reply, Rejection> {
        const FAILED: Rejection = Rejection::internal("Erro ao gerar quiz de sustentabilidade");
        let n = query::count(query, composer::MAX_QUESTIONS);

        let mut rng = StdRng::from_entropy();
        let questions = composer::compose_sustainability(&self.wiki, n, &mut rng).await;
        if questions.is_empty() {
            return Err(NO_QUESTIONS);
        }

        log::info!("serving {} sustainability question(s)", questions.len());
        reply::json(&QuizResult::new(String::from(composer::SUSTAINABILITY_TITLE), questions), FAILED)
    }

    async fn on_score<B>(&self, body: B) -> Result<Reply, Rejection>
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let bytes = Limited::new(body, MAX_BODY_BYTES)
            .collect()
            .await
            .map_err(|err| {
                log::warn!("cannot read score submission: {err}");
                BAD_SCORE
            })?
            .to_bytes();
        let submission = score::parse_submission(&bytes).ok_or(BAD_SCORE)?;

        match self.store.record_score(&submission.user, submission.score).await {
            Ok(()) => Ok(reply::message(StatusCode::OK, "Pontuação registrada no banco!")),
            Err(db::error::Error::BadInput) => Err(BAD_SCORE),
            Err(db::error::Error::Fatal) => {
                log::error!("cannot record score of {:?}", submission.user);
                Err(Rejection::internal("Erro ao salvar pontuação"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::App;
    use crate::stub::{Canned, Memory};
    use http_body_util::{BodyExt, Full};
    use hyper::{body::Bytes, header, Method, Request, StatusCode};
    use serde_json::{json, Value};

    fn app(canned: Canned) -> App<Canned, Memory> {
        App::new(canned.into_wiki(), Memory::default())
    }

    async fn call(app: &App<Canned, Memory>, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri).body(Full::new(Bytes::from(body.to_owned()))).unwrap();
        let res = app.respond(req).await;
        let status = res.status();
        assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    async fn get(app: &App<Canned, Memory>, uri: &str) -> (StatusCode, Value) {
        call(app, Method::GET, uri, "").await
    }

    fn rich(canned: Canned, topic: &str) -> Canned {
        let pages: Vec<_> = (0..12)
            .map(|i| json!({ "title": format!("{topic} {i}"), "description": format!("Descrição {i} de {topic}") }))
            .collect();
        canned
            .summary(topic, StatusCode::OK, json!({ "title": topic, "description": format!("sobre {topic}") }))
            .related(topic, StatusCode::OK, json!({ "pages": pages }))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn search_requires_query() {
        let app = app(Canned::default());
        let (status, body) = get(&app, "/search").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Parâmetro q é obrigatório");

        let (status, _) = get(&app, "/search?q=++").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn search_lists_hits() {
        let app = app(Canned::default().search(
            "energia solar",
            StatusCode::OK,
            json!({ "query": { "search": [
                {
                    "title": "Energia solar",
                    "snippet": "<span class=\"searchmatch\">Energia</span> do sol",
                    "pageid": 7,
                    "size": 10
                }
            ] } }),
        ));
        let (status, body) = get(&app, "/search?q=energia+solar").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "query": "energia solar",
                "results": [{
                    "title": "Energia solar",
                    "snippet": "<span class=\"searchmatch\">Energia</span> do sol",
                    "pageid": 7
                }]
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn summary_passes_upstream_status_through() {
        let app = app(Canned::default().summary(
            "NonexistentPageXYZ",
            StatusCode::NOT_FOUND,
            json!({ "type": "not_found" }),
        ));
        let (status, body) = get(&app, "/summary?title=NonexistentPageXYZ").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Página não encontrada na Wikipédia");

        let (status, _) = get(&app, "/summary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn summary_fills_missing_fields() {
        let app = app(Canned::default().summary(
            "Reciclagem",
            StatusCode::OK,
            json!({
                "title": "Reciclagem",
                "extract": "Texto.",
                "content_urls": { "desktop": { "page": "https://pt.wikipedia.org/wiki/Reciclagem" } }
            }),
        ));
        let (status, body) = get(&app, "/summary?title=Reciclagem").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "title": "Reciclagem",
                "description": "",
                "extract": "Texto.",
                "content_urls": { "desktop": { "page": "https://pt.wikipedia.org/wiki/Reciclagem" } }
            })
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn summary_forwards_content_urls_verbatim() {
        let content_urls = json!({
            "desktop": {
                "page": "https://pt.wikipedia.org/wiki/Lixo",
                "revisions": "https://pt.wikipedia.org/wiki/Lixo?action=history",
                "edit": "https://pt.wikipedia.org/wiki/Lixo?action=edit",
                "talk": "https://pt.wikipedia.org/wiki/Discussão:Lixo",
                "custom": { "nested": [1, 2] }
            },
            "mobile": { "page": "https://pt.m.wikipedia.org/wiki/Lixo" },
            "app": "wikipedia://Lixo"
        });
        let app = app(Canned::default().summary(
            "Lixo",
            StatusCode::OK,
            json!({ "title": "Lixo", "description": "resíduos", "content_urls": content_urls.clone() }),
        ));
        let (status, body) = get(&app, "/summary?title=Lixo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content_urls"], content_urls);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn quiz_respects_requested_count() {
        let app = app(rich(Canned::default(), "Reciclagem"));
        let (status, body) = get(&app, "/quiz?title=Reciclagem&n=7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Reciclagem");
        let questions = body["questions"].as_array().unwrap();
        assert!(questions.len() <= 7);
        assert_eq!(body["count"], questions.len());
        for question in questions {
            assert_eq!(question["type"], "multiple");
            let options = question["options"].as_array().unwrap();
            assert_eq!(options.len(), 4);
            assert_eq!(options.iter().filter(|opt| **opt == question["answer"]).count(), 1);
        }

        let (_, body) = get(&app, "/quiz?title=Reciclagem&n=20").await;
        assert!(body["count"].as_u64().unwrap() <= 10);
        assert_eq!(body["count"], body["questions"].as_array().unwrap().len());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn quiz_without_questions_is_not_found() {
        let app = app(Canned::default());
        let (status, body) = get(&app, "/quiz?title=NonexistentPageXYZ").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Não foi possível gerar perguntas.");

        let (status, body) = get(&app, "/quiz?n=3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Parâmetro title é obrigatório");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn sustainability_quiz_has_fixed_title() {
        let canned = crate::composer::SUSTAINABILITY_TOPICS.into_iter().fold(Canned::default(), rich);
        let app = app(canned);
        let (status, body) = get(&app, "/quiz-sustentabilidade?n=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Quiz de Sustentabilidade (Wikipédia)");
        assert_eq!(body["count"], 3);

        let app = self::app(Canned::default());
        let (status, _) = get(&app, "/quiz-sustentabilidade").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn score_creates_user_once() {
        let app = app(Canned::default());
        let (status, body) = call(&app, Method::POST, "/score", r#"{"user":"Ana","score":10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Pontuação registrada no banco!");
        assert_eq!(app.store.users.lock().unwrap().len(), 1);
        assert_eq!(app.store.scores.lock().unwrap().len(), 1);

        let (status, _) = call(&app, Method::POST, "/score", r#"{"user":"Ana","score":10}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.store.users.lock().unwrap().len(), 1);
        assert_eq!(app.store.scores.lock().unwrap().as_slice(), [(0, 10.0), (0, 10.0)]);

        let (status, _) = call(&app, Method::POST, "/score", r#"{"user":"ana","score":3}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.store.users.lock().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn score_validates_body() {
        let app = app(Canned::default());
        for body in [r#"{"user":"Ana","score":"10"}"#, r#"{"score":1}"#, r#"{"user":"","score":1}"#, "{", ""] {
            let (status, reply) = call(&app, Method::POST, "/score", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(reply["message"], "Informe { user, score:number }");
        }

        let huge = format!(r#"{{"user":"{}","score":1}}"#, "a".repeat(8 * 1024));
        let (status, _) = call(&app, Method::POST, "/score", &huge).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.store.users.lock().unwrap().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn score_reports_persistence_failures() {
        let app = App::new(Canned::default().into_wiki(), Memory { down: true, ..Default::default() });
        let (status, body) = call(&app, Method::POST, "/score", r#"{"user":"Ana","score":10}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Erro ao salvar pontuação");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_routes_and_preflight() {
        let app = app(Canned::default());
        let (status, _) = get(&app, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&app, "/score").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(&app, Method::OPTIONS, "/score", "").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
    }
}

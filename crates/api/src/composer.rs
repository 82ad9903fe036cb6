use crate::{builder::Builder, fetch::Fetch, wiki::Wiki};
use model::Question;
use rand::{seq::SliceRandom, Rng};

/// Largest quiz that may be requested.
pub const MAX_QUESTIONS: usize = 10;

/// Builder invocations allowed per requested question before the composer gives up on
/// finding new unique questions.
pub const ATTEMPTS_PER_QUESTION: usize = 4;

pub const SUSTAINABILITY_TITLE: &str = "Quiz de Sustentabilidade (Wikipédia)";

pub const SUSTAINABILITY_TOPICS: [&str; 9] = [
    "Energia renovável",
    "Reciclagem",
    "Mudanças climáticas",
    "Desmatamento",
    "Poluição da água",
    "Gás de efeito estufa",
    "Energia solar",
    "Energia eólica",
    "Biodiversidade",
];

fn push_unique(questions: &mut Vec<Question>, question: Question) {
    if questions.iter().any(|existing| existing.is_duplicate_of(&question)) {
        log::debug!("discarding duplicate question {:?}", question.question);
    } else {
        questions.push(question);
    }
}

/// Builds up to `n` (clamped to `1..=`[`MAX_QUESTIONS`]) unique questions about `topic` by
/// alternating between the builders. A failed builder is retried once with the other builder;
/// if that fails too, the quiz ends with whatever has been collected so far.
pub async fn compose<F, R>(wiki: &Wiki<F>, topic: &str, n: usize, rng: &mut R) -> Vec<Question>
where
    F: Fetch,
    R: Rng + ?Sized,
{
    let n = n.clamp(1, MAX_QUESTIONS);
    let mut questions = Vec::with_capacity(n);

    for attempt in 0..n * ATTEMPTS_PER_QUESTION {
        if questions.len() >= n {
            break;
        }

        let builder = Builder::ALL[attempt % Builder::ALL.len()];
        let err = match builder.build(wiki, topic, rng).await {
            Ok(question) => {
                push_unique(&mut questions, question);
                continue;
            }
            Err(err) => err,
        };

        log::warn!("{builder:?} question about {topic:?} failed: {err}");
        match builder.other().build(wiki, topic, rng).await {
            Ok(question) => push_unique(&mut questions, question),
            Err(err) => {
                log::warn!("fallback {:?} question about {topic:?} failed: {err}", builder.other());
                break;
            }
        }
    }

    questions
}

/// Builds a quiz of up to `n` questions drawn from distinct, randomly chosen sustainability
/// topics, one question per topic.
pub async fn compose_sustainability<F, R>(wiki: &Wiki<F>, n: usize, rng: &mut R) -> Vec<Question>
where
    F: Fetch,
    R: Rng + ?Sized,
{
    let n = n.clamp(1, MAX_QUESTIONS);
    let topics: Vec<_> = SUSTAINABILITY_TOPICS
        .choose_multiple(rng, n.min(SUSTAINABILITY_TOPICS.len()))
        .copied()
        .collect();

    let mut questions = Vec::with_capacity(n);
    for topic in topics {
        questions.extend(compose(wiki, topic, 1, rng).await);
        if questions.len() >= n {
            break;
        }
    }

    questions.truncate(n);
    questions
}

use crate::{
    distractor::{self, normalize},
    error::{Error, Result},
    fetch::Fetch,
    wiki::{self, Wiki},
};
use model::{
    wiki::{Related, SearchResults, Summary},
    Kind, Question,
};
use rand::{seq::SliceRandom, Rng};

/// Answer used when a page has neither a short description nor an extract.
pub const PLACEHOLDER: &str = "Conceito da Wikipédia";

/// Unrelated topics that serve as distractors for the related-title questions.
pub const GENERIC_TOPICS: [&str; 10] = [
    "Futebol",
    "Violino",
    "Montanhismo",
    "Revolução Francesa",
    "Pintura impressionista",
    "Culinária italiana",
    "Basquetebol",
    "Cinema mudo",
    "Arquitetura gótica",
    "Geografia da Antártida",
];

/// Strategies for synthesizing one question about a topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builder {
    /// "What best describes X?" answered by the page's short description.
    Description,
    /// "Which topic is most associated with X?" answered by the first related page.
    Related,
}

impl Builder {
    pub const ALL: [Self; 2] = [Self::Description, Self::Related];

    pub const fn other(self) -> Self {
        match self {
            Self::Description => Self::Related,
            Self::Related => Self::Description,
        }
    }

    pub async fn build<F, R>(self, wiki: &Wiki<F>, topic: &str, rng: &mut R) -> Result<Question>
    where
        F: Fetch,
        R: Rng + ?Sized,
    {
        match self {
            Self::Description => describe(wiki, topic, rng).await,
            Self::Related => relate(wiki, topic, rng).await,
        }
    }
}

/// Upper-cases the first character only.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The short description, else the first sentence of the extract, else the placeholder.
fn pick_answer(summary: &Summary) -> &str {
    if let Some(description) = summary.description.as_deref().filter(|text| !text.is_empty()) {
        return description;
    }

    summary
        .extract
        .as_deref()
        .and_then(|extract| extract.split(". ").next())
        .filter(|sentence| !sentence.is_empty())
        .unwrap_or(PLACEHOLDER)
}

fn finish<R: Rng + ?Sized>(
    question: String,
    answer: String,
    distractors: Vec<String>,
    source: Option<String>,
    rng: &mut R,
) -> Question {
    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(answer.clone());
    options.extend(distractors);
    options.shuffle(rng);
    Question { kind: Kind::Multiple, question, options, answer, source }
}

async fn describe<F, R>(wiki: &Wiki<F>, topic: &str, rng: &mut R) -> Result<Question>
where
    F: Fetch,
    R: Rng + ?Sized,
{
    let (summary, related, search) =
        tokio::join!(wiki.fetch_summary(topic), wiki.fetch_related(topic), wiki.fetch_search(topic));

    let summary = summary?;
    if !summary.is_success() {
        return Err(Error::SummaryNotFound);
    }
    let summary: Summary = wiki::decode(&summary)?;
    let answer = capitalize(pick_answer(&summary));

    // Both distractor sources are optional
    let related = related?;
    let descriptions: Vec<_> = if related.is_success() {
        let related: Related = wiki::decode(&related)?;
        related.descriptions().map(String::from).collect()
    } else {
        Vec::new()
    };

    let search = search?;
    let snippets: Vec<_> = if search.is_success() {
        let results: SearchResults = wiki::decode(&search)?;
        results.into_hits().into_iter().map(|hit| hit.snippet).collect()
    } else {
        Vec::new()
    };

    let distractors = distractor::assemble(&answer, descriptions, snippets, rng);
    let title = if summary.title.is_empty() { topic } else { summary.title.as_str() };
    let question = format!("Qual é a melhor descrição de “{title}”?");
    let source = summary.page_url().map(String::from);
    Ok(finish(question, answer, distractors, source, rng))
}

async fn relate<F, R>(wiki: &Wiki<F>, topic: &str, rng: &mut R) -> Result<Question>
where
    F: Fetch,
    R: Rng + ?Sized,
{
    let reply = wiki.fetch_related(topic).await?;
    if !reply.is_success() {
        return Err(Error::RelatedUnavailable);
    }

    let related: Related = wiki::decode(&reply)?;
    let first = related.titles().next().map(String::from);
    drop(related);
    let Some(answer) = first else {
        log::debug!("no related pages for {topic:?}, asking for its description instead");
        return describe(wiki, topic, rng).await;
    };

    let excluded = [normalize(topic), normalize(&answer)];
    let candidates: Vec<_> = GENERIC_TOPICS
        .into_iter()
        .filter(|generic| !excluded.contains(&normalize(generic)))
        .collect();
    let distractors = candidates
        .choose_multiple(rng, distractor::COUNT)
        .map(|&generic| String::from(generic))
        .collect();

    let question = format!("Qual destes tópicos está mais diretamente associado a “{topic}”?");
    let source = Some(wiki.related_url(topic));
    Ok(finish(question, answer, distractors, source, rng))
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::transport::{graphql, request, Method, Transport};
use super::{add_identity, or_default, Provider};
use crate::error::{Error, Result};
use crate::models::{
    strip_html, Challenge, ErrorClass, ErrorReport, Filters, Language, Platform, Statistics,
    SubmissionReport, Verdict,
};
use crate::submission::{self, Clock, Judge, Poll, Schedule, SystemClock};

const GLOBAL_DATA: &str = r#"
query globalData {
  userStatus {
    isSignedIn
  }
}"#;

const RANDOM_QUESTION: &str = r#"
query randomQuestion($categorySlug: String, $filters: QuestionListFilterInput) {
  randomQuestion(categorySlug: $categorySlug, filters: $filters) {
    titleSlug
  }
}"#;

const QUESTION_DATA: &str = r#"
query questionData($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    title
    titleSlug
    content
    difficulty
    codeSnippets {
      lang
      langSlug
      code
    }
  }
}"#;

/// Judge status codes.
mod status {
    pub const ACCEPTED: i32 = 10;
    pub const WRONG_ANSWER: i32 = 11;
    pub const TIME_LIMIT_EXCEEDED: i32 = 14;
    pub const RUNTIME_ERROR: i32 = 15;
    pub const COMPILE_ERROR: i32 = 20;
}

#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatus {
    is_signed_in: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalData {
    user_status: UserStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TitleSlug {
    #[serde(default)]
    title_slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RandomQuestion {
    random_question: Option<TitleSlug>,
}

#[derive(Debug, Deserialize)]
struct QuestionEnvelope {
    question: Option<Question>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeSnippet {
    lang_slug: String,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    question_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    title_slug: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    code_snippets: Option<Vec<CodeSnippet>>,
}

/// A LeetCode problem, with its starter code keyed by language slug.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawQuestion")]
pub struct Question {
    pub question_id: String,
    pub title: String,
    pub title_slug: String,
    pub difficulty: String,
    pub content: String,
    snippets: BTreeMap<String, String>,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let snippets = raw
            .code_snippets
            .unwrap_or_default()
            .into_iter()
            .map(|s| (s.lang_slug, s.code))
            .collect();

        Self {
            question_id: raw.question_id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            title_slug: raw.title_slug.unwrap_or_default(),
            difficulty: raw.difficulty.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
            snippets,
        }
    }
}

impl Challenge for Question {
    fn prompt(&self) -> String {
        strip_html(&self.content)
    }

    fn snippet(&self, language: Language) -> Result<String> {
        let slug = language
            .platform_slug(Platform::Leetcode)
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} on leetcode", language.key()),
            })?;
        self.snippets
            .get(slug)
            .cloned()
            .ok_or_else(|| Error::SnippetNotFound {
                platform: Platform::Leetcode.to_string(),
                language: slug.to_string(),
            })
    }

    fn identify(&self) -> Filters {
        let mut filters = Filters::new();
        add_identity(&mut filters, "slug", &self.title_slug);
        add_identity(&mut filters, "id", &self.question_id);
        filters
    }
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    lang: &'a str,
    question_id: &'a str,
    typed_code: &'a str,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    submission_id: i64,
}

/// Verdict payload from the submission check endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckResponse {
    #[serde(deserialize_with = "or_default")]
    pub state: String,
    #[serde(deserialize_with = "or_default")]
    pub status_code: i32,
    #[serde(deserialize_with = "or_default")]
    pub status_msg: String,
    #[serde(deserialize_with = "or_default")]
    pub lang: String,
    #[serde(deserialize_with = "or_default")]
    pub pretty_lang: String,
    #[serde(deserialize_with = "or_default")]
    pub run_success: bool,
    #[serde(deserialize_with = "or_default")]
    pub status_runtime: String,
    #[serde(deserialize_with = "or_default")]
    pub status_memory: String,
    pub runtime_percentile: Option<f64>,
    pub memory_percentile: Option<f64>,
    #[serde(deserialize_with = "or_default")]
    pub compile_error: String,
    #[serde(deserialize_with = "or_default")]
    pub full_compile_error: String,
    #[serde(deserialize_with = "or_default")]
    pub runtime_error: String,
    #[serde(deserialize_with = "or_default")]
    pub full_runtime_error: String,
    #[serde(deserialize_with = "or_default")]
    pub input: String,
    #[serde(deserialize_with = "or_default")]
    pub input_formatted: String,
    #[serde(deserialize_with = "or_default")]
    pub last_testcase: String,
    #[serde(deserialize_with = "or_default")]
    pub elapsed_time: u64,
    pub code_output: Value,
    pub std_output: Value,
    pub expected_output: Value,
    pub total_correct: Option<u64>,
    pub total_testcases: Option<u64>,
    pub submission_id: Value,
}

/// Outputs come back as a string or as a list of lines depending on the
/// problem type.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

fn one_line(s: &str) -> String {
    s.trim_end_matches('\n').replace('\n', ", ")
}

impl CheckResponse {
    fn is_done(&self) -> bool {
        self.state == "SUCCESS"
    }

    fn raw(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl SubmissionReport for CheckResponse {
    fn verdict(&self) -> Verdict {
        match self.status_code {
            status::ACCEPTED if self.has_succeeded() => Verdict::Accepted,
            status::WRONG_ANSWER => Verdict::WrongAnswer,
            status::TIME_LIMIT_EXCEEDED => Verdict::TimeLimitExceeded,
            status::RUNTIME_ERROR => Verdict::RuntimeError,
            status::COMPILE_ERROR => Verdict::CompileError,
            _ => Verdict::OtherFailure,
        }
    }

    fn has_succeeded(&self) -> bool {
        self.status_code == status::ACCEPTED
            && self.run_success
            && self.total_correct == self.total_testcases
    }

    fn identify(&self) -> String {
        text(&self.submission_id)
    }

    fn statistics(&self) -> Statistics {
        Statistics {
            total_test_cases: self.total_testcases.unwrap_or_default(),
            runtime: self.status_runtime.clone(),
            runtime_percentile: self.runtime_percentile.unwrap_or(f64::NAN),
            memory: self.status_memory.clone(),
            memory_percentile: self.memory_percentile.unwrap_or(f64::NAN),
            ..Statistics::default()
        }
    }

    fn error_report(&self) -> ErrorReport {
        match self.status_code {
            status::RUNTIME_ERROR => ErrorReport::new(
                ErrorClass::RuntimeError,
                &self.runtime_error,
                format!("last test case: {}", one_line(&self.last_testcase)),
                format!(
                    "expected output: {}\n\nruntime error: {}\n",
                    text(&self.expected_output),
                    self.full_runtime_error
                ),
            ),
            status::COMPILE_ERROR => ErrorReport::new(
                ErrorClass::CompileError,
                &self.compile_error,
                "",
                format!("{}\n", self.full_compile_error),
            ),
            status::WRONG_ANSWER => ErrorReport::new(
                ErrorClass::WrongAnswer,
                "solution provided an invalid answer",
                format!("on input: {}", one_line(&self.input_formatted)),
                format!(
                    "expected: {}\ngot: {}\n",
                    text(&self.expected_output),
                    text(&self.code_output)
                ),
            ),
            status::TIME_LIMIT_EXCEEDED => ErrorReport::new(
                ErrorClass::TimeLimitExceeded,
                "solution took too long",
                format!("solution took: {}ms", self.elapsed_time),
                format!(
                    "on input: {}\nexpected output: {}\n",
                    one_line(&self.last_testcase),
                    text(&self.expected_output)
                ),
            ),
            code => ErrorReport::unhandled(format!("{} ({})", self.status_msg, code), &self.raw()),
        }
    }
}

fn parse_difficulty(value: &str) -> Result<Option<&'static str>> {
    match value {
        "" => Ok(None),
        "easy" => Ok(Some("EASY")),
        "medium" => Ok(Some("MEDIUM")),
        "hard" => Ok(Some("HARD")),
        other => Err(Error::InvalidFilterValue {
            name: "difficulty".to_string(),
            value: other.to_string(),
            expected: "easy, medium, hard".to_string(),
        }),
    }
}

fn parse_status(value: &str) -> Result<Option<&'static str>> {
    match value {
        "" => Ok(None),
        "todo" => Ok(Some("NOT_SOLVED")),
        "attempted" => Ok(Some("TRIED")),
        "solved" => Ok(Some("AC")),
        other => Err(Error::InvalidFilterValue {
            name: "status".to_string(),
            value: other.to_string(),
            expected: "todo, attempted, solved".to_string(),
        }),
    }
}

#[derive(Debug, Default, Serialize)]
struct QuestionListFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    difficulty: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
}

/// Submit and check calls, borrowed from the provider for one submission.
struct Submissions<'a, T> {
    transport: &'a T,
}

impl<T: Transport> Judge for Submissions<'_, T> {
    type Handle = i64;
    type Outcome = CheckResponse;

    fn platform(&self) -> Platform {
        Platform::Leetcode
    }

    fn submit(&self, filters: &Filters, language: Language, code: &str) -> Result<i64> {
        let slug = filters.get("slug")?;
        let question_id = filters.get("id")?;
        let lang = language
            .platform_slug(Platform::Leetcode)
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} on leetcode", language.key()),
            })?;

        let body = SubmitRequest {
            lang,
            question_id,
            typed_code: code,
        };
        let response: SubmitResponse = request(
            self.transport,
            Method::Post,
            &format!("/problems/{}/submit/", slug),
            Some(&body),
        )?;
        Ok(response.submission_id)
    }

    fn check(&self, id: &i64) -> Result<Poll<CheckResponse>> {
        let response: CheckResponse = request(
            self.transport,
            Method::Get,
            &format!("/submissions/detail/{}/check/", id),
            None::<&()>,
        )?;
        if response.is_done() {
            Ok(Poll::Ready(response))
        } else {
            Ok(Poll::Pending)
        }
    }
}

pub struct LeetCode<T, C = SystemClock> {
    transport: T,
    schedule: Schedule,
    clock: C,
}

impl<T: Transport> LeetCode<T> {
    pub fn new(transport: T, schedule: Schedule) -> Self {
        Self::with_clock(transport, schedule, SystemClock)
    }
}

impl<T: Transport, C: Clock> LeetCode<T, C> {
    pub fn with_clock(transport: T, schedule: Schedule, clock: C) -> Self {
        Self {
            transport,
            schedule,
            clock,
        }
    }

    pub fn question(&self, slug: &str) -> Result<Question> {
        let response: Data<QuestionEnvelope> = graphql(
            &self.transport,
            "questionData",
            QUESTION_DATA,
            Some(&json!({ "titleSlug": slug })),
        )?;
        response.data.question.ok_or_else(|| Error::NoChallengeFound {
            reason: format!("no question with slug {}", slug),
        })
    }
}

impl<T: Transport, C: Clock> Provider for LeetCode<T, C> {
    fn platform(&self) -> Platform {
        Platform::Leetcode
    }

    fn is_signed_in(&self) -> Result<bool> {
        let response: Data<GlobalData> =
            graphql(&self.transport, "globalData", GLOBAL_DATA, None::<&()>)?;
        Ok(response.data.user_status.is_signed_in)
    }

    fn get_challenge(&self, filters: &Filters) -> Result<Box<dyn Challenge>> {
        let question = self.question(filters.get("slug")?)?;
        debug!(
            slug = %question.title_slug,
            title = %question.title,
            difficulty = %question.difficulty,
            "fetched question"
        );
        Ok(Box::new(question))
    }

    fn find_next_challenge(&self, filters: &Filters) -> Result<Filters> {
        let list_filter = QuestionListFilter {
            difficulty: parse_difficulty(filters.get_or_default("difficulty"))?,
            status: parse_status(filters.get_or_default("status"))?,
            tags: match filters.get_or_default("tags") {
                "" => Vec::new(),
                tag => vec![tag.to_string()],
            },
        };
        let variables = json!({
            "categorySlug": filters.get_or_default("category"),
            "filters": list_filter,
        });

        let response: Data<RandomQuestion> =
            graphql(&self.transport, "randomQuestion", RANDOM_QUESTION, Some(&variables))?;
        let slug = response
            .data
            .random_question
            .map(|q| q.title_slug)
            .unwrap_or_default();
        if slug.is_empty() {
            return Err(Error::NoChallengeFound {
                reason: "try removing conditions".to_string(),
            });
        }

        Filters::new().with("slug", &slug)
    }

    fn submit(
        &self,
        filters: &Filters,
        language: Language,
        code: &str,
    ) -> Result<Box<dyn SubmissionReport>> {
        let filters = if filters.contains("id") {
            filters.clone()
        } else {
            debug!("no question id given, looking it up");
            let question = self.question(filters.get("slug")?)?;
            filters.merge(&question.identify())
        };

        let judge = Submissions {
            transport: &self.transport,
        };
        let outcome = submission::submit_and_wait(
            &judge,
            &filters,
            language,
            code,
            &self.schedule,
            &self.clock,
        )?;
        info!(status = outcome.status_code, msg = %outcome.status_msg, "leetcode verdict");
        Ok(Box::new(outcome))
    }
}

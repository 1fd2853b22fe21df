use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::transport::{request, Method, Transport, TransportError};
use super::{add_identity, or_default, Provider};
use crate::error::{Error, Result};
use crate::models::{
    Challenge, ErrorClass, ErrorReport, Filters, Language, Platform, Statistics,
    SubmissionReport, Verdict,
};
use crate::submission::{self, Clock, Judge, Poll, Schedule, SystemClock};

pub const DEFAULT_CONTEST: &str = "master";

const TRACKS: [&str; 14] = [
    "algorithms",
    "data-structures",
    "mathematics",
    "ai",
    "c",
    "cpp",
    "java",
    "python",
    "ruby",
    "sql",
    "databases",
    "shell",
    "fp",
    "regex",
];

const PENDING: [&str; 2] = ["Processing", "Queued"];

fn contest_of(filters: &Filters) -> &str {
    match filters.get_or_default("contest") {
        "" => DEFAULT_CONTEST,
        contest => contest,
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    model: Value,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Many<T> {
    models: Vec<T>,
}

/// Request whose answer is wrapped as `{"model": ..., "message": ...}`.
fn model<T, I, O>(transport: &T, method: Method, path: &str, input: Option<&I>) -> Result<O>
where
    T: Transport + ?Sized,
    I: Serialize + ?Sized,
    O: DeserializeOwned,
{
    let envelope: Envelope = request(transport, method, path, input)?;
    match envelope.message {
        Some(message) if !message.is_empty() => Err(TransportError::Server { message }.into()),
        _ => serde_json::from_value(envelope.model).map_err(|e| TransportError::Decode(e).into()),
    }
}

#[derive(Debug, Deserialize)]
struct RawChallenge {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    contest_slug: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    body_html: Option<String>,
    #[serde(default)]
    max_score: Option<f64>,
    #[serde(flatten)]
    extra: HashMap<String, Value>,
}

/// A HackerRank challenge.
///
/// Starter code arrives as `<slug>_template_head`, `<slug>_template` and
/// `<slug>_template_tail` fields; these are joined per language slug when the
/// payload is decoded.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawChallenge")]
pub struct ChallengeData {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub contest_slug: String,
    pub category: String,
    pub body_html: String,
    pub max_score: f64,
    templates: BTreeMap<String, String>,
}

impl From<RawChallenge> for ChallengeData {
    fn from(raw: RawChallenge) -> Self {
        let field = |name: String| {
            raw.extra
                .get(&name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let mut templates = BTreeMap::new();
        for slug in Language::ALL
            .iter()
            .filter_map(|lang| lang.platform_slug(Platform::Hackerrank))
        {
            let joined = format!(
                "{}{}{}",
                field(format!("{}_template_head", slug)),
                field(format!("{}_template", slug)),
                field(format!("{}_template_tail", slug)),
            );
            if !joined.is_empty() {
                templates.insert(slug.to_string(), joined);
            }
        }

        Self {
            id: raw.id.unwrap_or_default(),
            slug: raw.slug.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            contest_slug: raw.contest_slug.unwrap_or_default(),
            category: raw.category.unwrap_or_default(),
            body_html: raw.body_html.unwrap_or_default(),
            max_score: raw.max_score.unwrap_or_default(),
            templates,
        }
    }
}

impl ChallengeData {
    fn prompt_file(&self) -> String {
        format!("{}.html", self.slug)
    }
}

impl Challenge for ChallengeData {
    fn prompt(&self) -> String {
        format!("For instructions open: {}", self.prompt_file())
    }

    fn snippet(&self, language: Language) -> Result<String> {
        let slug = language
            .platform_slug(Platform::Hackerrank)
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} on hackerrank", language.key()),
            })?;
        self.templates
            .get(slug)
            .cloned()
            .ok_or_else(|| Error::SnippetNotFound {
                platform: Platform::Hackerrank.to_string(),
                language: slug.to_string(),
            })
    }

    fn files(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(self.prompt_file(), self.body_html.clone())])
    }

    fn identify(&self) -> Filters {
        let mut filters = Filters::new();
        add_identity(&mut filters, "slug", &self.slug);
        add_identity(&mut filters, "category", &self.category);
        add_identity(&mut filters, "contest", &self.contest_slug);
        filters
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestcaseData {
    #[serde(deserialize_with = "or_default")]
    pub stdin: String,
    #[serde(deserialize_with = "or_default")]
    pub expected_output: String,
}

#[derive(Debug, Deserialize)]
struct Purchase {
    #[serde(default)]
    hacko_amount: i64,
}

#[derive(Debug, Deserialize)]
struct Notifications {
    #[serde(default)]
    status: bool,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    code: &'a str,
    contest_slug: &'a str,
    language: &'a str,
    playlist_slug: &'a str,
}

/// Judge state of one submission, as returned by the submissions endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionState {
    #[serde(deserialize_with = "or_default")]
    pub id: i64,
    #[serde(deserialize_with = "or_default")]
    pub contest_id: i64,
    #[serde(deserialize_with = "or_default")]
    pub challenge_id: i64,
    #[serde(deserialize_with = "or_default")]
    pub language: String,
    #[serde(deserialize_with = "or_default")]
    pub status: String,
    #[serde(deserialize_with = "or_default")]
    pub challenge_slug: String,
    #[serde(deserialize_with = "or_default")]
    pub contest_slug: String,
    #[serde(deserialize_with = "or_default")]
    pub compile_status: i64,
    #[serde(deserialize_with = "or_default")]
    pub compile_message: String,
    #[serde(deserialize_with = "or_default")]
    pub testcase_status: Vec<i64>,
    #[serde(deserialize_with = "or_default")]
    pub testcase_message: Vec<String>,
    #[serde(rename = "codecheck_time", deserialize_with = "or_default")]
    pub codechecker_time: Vec<f64>,
    #[serde(deserialize_with = "or_default")]
    pub codechecker_signal: Vec<i64>,
    #[serde(deserialize_with = "or_default")]
    pub individual_test_case_score: Vec<f64>,
    pub display_score: Value,
    #[serde(skip)]
    pub max_score: f64,
    #[serde(skip)]
    pub failed_testcase: Option<TestcaseData>,
}

fn class_of(message: &str) -> ErrorClass {
    match message {
        "Wrong Answer" => ErrorClass::WrongAnswer,
        "Terminated due to timeout" => ErrorClass::TimeLimitExceeded,
        "Runtime Error" | "Segmentation Fault" | "Abort Called" => ErrorClass::RuntimeError,
        _ => ErrorClass::Unhandled,
    }
}

impl SubmissionState {
    pub fn is_done(&self) -> bool {
        !PENDING.contains(&self.status.as_str())
    }

    /// Index and message of the first test case that did not pass.
    pub fn first_failed(&self) -> Option<(usize, &str)> {
        self.testcase_message
            .iter()
            .enumerate()
            .find(|(_, msg)| msg.as_str() != "Success")
            .map(|(idx, msg)| (idx, msg.as_str()))
    }

    fn raw(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{:?}", self))
    }

    fn compile_report(&self) -> ErrorReport {
        let mut parts = self.compile_message.splitn(3, ':');
        let message = parts.next().unwrap_or_default().trim();
        let header = parts.next().unwrap_or_default().trim();

        ErrorReport::new(
            ErrorClass::CompileError,
            if message.is_empty() {
                "compilation failed"
            } else {
                message
            },
            header,
            format!("{}\n", self.compile_message.trim_end()),
        )
    }
}

impl SubmissionReport for SubmissionState {
    fn verdict(&self) -> Verdict {
        if self.has_succeeded() {
            return Verdict::Accepted;
        }
        if self.compile_status != 0 {
            return Verdict::CompileError;
        }
        let message = self.first_failed().map(|(_, msg)| msg).unwrap_or(&self.status);
        match class_of(message) {
            ErrorClass::WrongAnswer => Verdict::WrongAnswer,
            ErrorClass::TimeLimitExceeded => Verdict::TimeLimitExceeded,
            ErrorClass::RuntimeError => Verdict::RuntimeError,
            _ => Verdict::OtherFailure,
        }
    }

    fn has_succeeded(&self) -> bool {
        self.status == "Accepted" || self.status == "Success"
    }

    fn identify(&self) -> String {
        SubmissionPath {
            contest: self.contest_slug.clone(),
            slug: self.challenge_slug.clone(),
            id: self.id,
        }
        .to_string()
    }

    fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total_test_cases: self.individual_test_case_score.len() as u64,
            ..Statistics::default()
        };

        // codecheck_time is reported in seconds
        let total: f64 = self.codechecker_time.iter().sum();
        if total != 0.0 {
            stats.runtime = format!("{:.0}ms", total * 1000.0);
        }

        let score = match &self.display_score {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if !score.is_empty() {
            stats.score = format!("{}pts", score);
        }
        if self.max_score > 0.0 {
            stats.max_score = format!("{}pts", self.max_score);
        }
        stats
    }

    fn error_report(&self) -> ErrorReport {
        if self.compile_status != 0 {
            return self.compile_report();
        }

        let Some((idx, msg)) = self.first_failed() else {
            return ErrorReport::unhandled(
                format!("{} ({} test cases)", self.status, self.testcase_message.len()),
                &self.raw(),
            );
        };

        let message = format!("Test Case {}: {}", idx, msg);
        match (class_of(msg), &self.failed_testcase) {
            (ErrorClass::Unhandled, _) => ErrorReport::unhandled(message, &self.raw()),
            (class, Some(data)) => {
                let stdin = if data.stdin.is_empty() {
                    "[paywalled, use the --purchase flag to unlock]".to_string()
                } else {
                    data.stdin.trim_end_matches('\n').replace('\n', ", ")
                };
                let expected = if data.expected_output.is_empty() {
                    "[paywalled]"
                } else {
                    data.expected_output.as_str()
                };
                ErrorReport::new(
                    class,
                    message,
                    format!("last test case: {}", stdin),
                    format!("expected output: {}\n", expected),
                )
            }
            (class, None) => ErrorReport::new(class, message, "", ""),
        }
    }
}

/// Where a submission can be polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPath {
    pub contest: String,
    pub slug: String,
    pub id: i64,
}

impl fmt::Display for SubmissionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/rest/contests/{}/challenges/{}/submissions/{}",
            self.contest, self.slug, self.id
        )
    }
}

struct Submissions<'a, T> {
    transport: &'a T,
}

impl<T: Transport> Judge for Submissions<'_, T> {
    type Handle = SubmissionPath;
    type Outcome = SubmissionState;

    fn platform(&self) -> Platform {
        Platform::Hackerrank
    }

    fn submit(&self, filters: &Filters, language: Language, code: &str) -> Result<SubmissionPath> {
        let slug = filters.get("slug")?;
        let contest = contest_of(filters);
        let lang = language
            .platform_slug(Platform::Hackerrank)
            .ok_or_else(|| Error::UnknownLanguage {
                name: format!("{} on hackerrank", language.key()),
            })?;

        let body = SubmitRequest {
            code,
            contest_slug: contest,
            language: lang,
            playlist_slug: "",
        };
        let state: SubmissionState = model(
            self.transport,
            Method::Post,
            &format!("/rest/contests/{}/challenges/{}/submissions", contest, slug),
            Some(&body),
        )?;

        Ok(SubmissionPath {
            contest: contest.to_string(),
            slug: slug.to_string(),
            id: state.id,
        })
    }

    fn check(&self, path: &SubmissionPath) -> Result<Poll<SubmissionState>> {
        let state: SubmissionState =
            model(self.transport, Method::Get, &path.to_string(), None::<&()>)?;
        debug!(status = %state.status, "submission state");
        if state.is_done() {
            Ok(Poll::Ready(state))
        } else {
            Ok(Poll::Pending)
        }
    }
}

pub struct HackerRank<T, C = SystemClock> {
    transport: T,
    schedule: Schedule,
    clock: C,
    purchase: bool,
}

impl<T: Transport> HackerRank<T> {
    pub fn new(transport: T, schedule: Schedule) -> Self {
        Self::with_clock(transport, schedule, SystemClock)
    }
}

impl<T: Transport, C: Clock> HackerRank<T, C> {
    pub fn with_clock(transport: T, schedule: Schedule, clock: C) -> Self {
        Self {
            transport,
            schedule,
            clock,
            purchase: false,
        }
    }

    /// Spend hackos on locked test cases when a submission fails.
    pub fn purchase_testcases(mut self, purchase: bool) -> Self {
        self.purchase = purchase;
        self
    }

    pub fn challenge(&self, contest: &str, slug: &str) -> Result<ChallengeData> {
        debug!(%contest, %slug, "fetching challenge");
        model(
            &self.transport,
            Method::Get,
            &format!("/rest/contests/{}/challenges/{}/", contest, slug),
            None::<&()>,
        )
    }

    /// Stdin and expected output of one test case, buying it first if it is
    /// locked and purchasing is enabled. Locked cases come back empty.
    fn testcase(&self, state: &SubmissionState, contest: &str, testcase: usize) -> Result<TestcaseData> {
        let base = format!("/rest/contests/{}/testcases/{}", contest, state.challenge_id);

        let unlocked: Vec<i64> = request(
            &self.transport,
            Method::Get,
            &format!("{}/all/unlocked_testcases", base),
            None::<&()>,
        )?;

        if !unlocked.contains(&(testcase as i64)) {
            if !self.purchase {
                info!(testcase, "test case is locked, not purchasing");
                return Ok(TestcaseData::default());
            }
            let receipt: Purchase = request(
                &self.transport,
                Method::Get,
                &format!("{}/{}/purchase?submission_id={}", base, testcase, state.id),
                None::<&()>,
            )?;
            info!(testcase, hackos_left = receipt.hacko_amount, "purchased test case");
        }

        request(
            &self.transport,
            Method::Get,
            &format!("{}/{}/testcase_data", base, testcase),
            None::<&()>,
        )
    }
}

impl<T: Transport, C: Clock> Provider for HackerRank<T, C> {
    fn platform(&self) -> Platform {
        Platform::Hackerrank
    }

    fn is_signed_in(&self) -> Result<bool> {
        let response: Notifications = request(
            &self.transport,
            Method::Get,
            "/rest/contests/master/notifications/summary",
            None::<&()>,
        )?;
        Ok(response.status)
    }

    fn get_challenge(&self, filters: &Filters) -> Result<Box<dyn Challenge>> {
        let challenge = self.challenge(contest_of(filters), filters.get("slug")?)?;
        debug!(name = %challenge.name, id = challenge.id, "fetched challenge");
        Ok(Box::new(challenge))
    }

    fn find_next_challenge(&self, filters: &Filters) -> Result<Filters> {
        // listing without a track is a very expensive search on their side
        let track = match filters.get_or_default("track") {
            "" => {
                return Err(Error::NoChallengeFound {
                    reason: format!("a track is required, one of: {}", TRACKS.join(", ")),
                })
            }
            track => track,
        };

        let status = match filters.get_or_default("status") {
            "" => "unsolved",
            status => status,
        };
        let params = [
            ("difficulty", filters.get_or_default("difficulty")),
            ("subdomains", filters.get_or_default("tags")),
            ("skills", filters.get_or_default("skills")),
            ("status", status),
        ];

        // filter values are tokens, only the brackets need escaping
        let mut query = String::from("offset=0&limit=1");
        for (name, value) in params.iter().filter(|(_, v)| !v.is_empty()) {
            query.push_str(&format!("&filters%5B{}%5D%5B%5D={}", name, value));
        }

        let path = format!(
            "/rest/contests/{}/tracks/{}/challenges?{}",
            contest_of(filters),
            track,
            query
        );
        let list: Many<ChallengeData> = request(&self.transport, Method::Get, &path, None::<&()>)?;

        list.models
            .first()
            .map(Challenge::identify)
            .ok_or_else(|| Error::NoChallengeFound {
                reason: "try removing conditions".to_string(),
            })
    }

    fn submit(
        &self,
        filters: &Filters,
        language: Language,
        code: &str,
    ) -> Result<Box<dyn SubmissionReport>> {
        let contest = contest_of(filters);
        let challenge = self.challenge(contest, filters.get("slug")?)?;

        let judge = Submissions {
            transport: &self.transport,
        };
        let mut state = submission::submit_and_wait(
            &judge,
            filters,
            language,
            code,
            &self.schedule,
            &self.clock,
        )?;
        state.max_score = challenge.max_score;
        info!(status = %state.status, "hackerrank verdict");

        let failed = state.first_failed().map(|(idx, _)| idx);
        if !state.has_succeeded() && state.compile_status == 0 {
            if let Some(idx) = failed {
                match self.testcase(&state, contest, idx) {
                    Ok(data) => state.failed_testcase = Some(data),
                    Err(e) => warn!(testcase = idx, "could not retrieve test case data: {}", e),
                }
            }
        }

        Ok(Box::new(state))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::models::Report;
    use crate::provider::transport::mock::ScriptedTransport;
    use crate::submission::tests::SimClock;

    const CHALLENGE: &str = "/rest/contests/master/challenges/solve-me-first/";
    const SUBMIT: &str = "/rest/contests/master/challenges/solve-me-first/submissions";
    const POLL: &str = "/rest/contests/master/challenges/solve-me-first/submissions/77";
    const UNLOCKED: &str = "/rest/contests/master/testcases/9/all/unlocked_testcases";
    const PURCHASE: &str = "/rest/contests/master/testcases/9/1/purchase?submission_id=77";
    const TESTCASE: &str = "/rest/contests/master/testcases/9/1/testcase_data";

    fn challenge_json() -> Value {
        json!({"model": {
            "id": 9,
            "slug": "solve-me-first",
            "name": "Solve Me First",
            "contest_slug": "master",
            "category": "ai",
            "body_html": "<p>Add two numbers.</p>",
            "max_score": 30,
            "c_template_head": "#include <stdio.h>\n",
            "c_template": "int solveMeFirst(int a, int b) {\n}\n",
            "c_template_tail": "int main() {}\n",
            "go_template": "func solveMeFirst() {}",
            "python3_template_head": null
        }})
    }

    fn provider(transport: ScriptedTransport) -> HackerRank<ScriptedTransport, SimClock> {
        HackerRank::with_clock(transport, Schedule::new(Duration::from_secs(5)), SimClock::new())
    }

    fn state(value: Value) -> SubmissionState {
        serde_json::from_value(value).unwrap()
    }

    fn wrong_answer() -> Value {
        json!({
            "id": 77,
            "challenge_id": 9,
            "status": "Wrong Answer",
            "challenge_slug": "solve-me-first",
            "contest_slug": "master",
            "compile_status": 0,
            "testcase_message": ["Success", "Wrong Answer", "Wrong Answer"],
            "codecheck_time": [0.01, 0.02, 0.0],
            "individual_test_case_score": [1.0, 0.0, 0.0],
            "display_score": "10.0"
        })
    }

    fn solve_me_first() -> Filters {
        Filters::new().with("slug", "solve-me-first").unwrap()
    }

    #[test]
    fn test_templates_are_joined() {
        let envelope: Envelope = serde_json::from_value(challenge_json()).unwrap();
        let challenge: ChallengeData = serde_json::from_value(envelope.model).unwrap();

        assert_eq!(
            challenge.snippet(Language::C).unwrap(),
            "#include <stdio.h>\nint solveMeFirst(int a, int b) {\n}\nint main() {}\n"
        );
        assert_eq!(challenge.snippet(Language::Golang).unwrap(), "func solveMeFirst() {}");
        assert!(matches!(
            challenge.snippet(Language::Python3),
            Err(Error::SnippetNotFound { .. })
        ));
        assert!(matches!(
            challenge.snippet(Language::Rust),
            Err(Error::SnippetNotFound { .. })
        ));
        assert_eq!(challenge.max_score, 30.0);
    }

    #[test]
    fn test_prompt_points_at_html_file() {
        let envelope: Envelope = serde_json::from_value(challenge_json()).unwrap();
        let challenge: ChallengeData = serde_json::from_value(envelope.model).unwrap();

        assert_eq!(challenge.prompt(), "For instructions open: solve-me-first.html");
        assert_eq!(
            challenge.files().get("solve-me-first.html").unwrap(),
            "<p>Add two numbers.</p>"
        );
        assert_eq!(
            challenge.identify().render(),
            "slug=solve-me-first category=ai contest=master"
        );
    }

    #[test]
    fn test_pending_statuses() {
        assert!(!state(json!({"status": "Processing"})).is_done());
        assert!(!state(json!({"status": "Queued"})).is_done());
        assert!(state(json!({"status": "Accepted"})).is_done());
        assert!(state(json!({"status": "Wrong Answer"})).is_done());
    }

    #[test]
    fn test_success_and_statistics() {
        let mut accepted = state(json!({
            "status": "Accepted",
            "testcase_message": ["Success", "Success"],
            "codecheck_time": [0.012, 0.03],
            "individual_test_case_score": [0.5, 0.5],
            "display_score": "30.0"
        }));
        accepted.max_score = 30.0;

        assert!(accepted.has_succeeded());
        assert_eq!(accepted.verdict(), Verdict::Accepted);
        let stats = accepted.statistics();
        assert_eq!(stats.total_test_cases, 2);
        assert_eq!(stats.runtime, "42ms");
        assert!(stats.runtime_percentile.is_nan());
        assert_eq!(stats.score, "30.0pts");
        assert_eq!(stats.max_score, "30pts");
        assert!(state(json!({"status": "Success"})).has_succeeded());
    }

    #[test]
    fn test_compile_error_is_split() {
        let failed = state(json!({
            "status": "Compilation error",
            "compile_status": 1,
            "compile_message": "Compilation error: solution.c:3: error: expected ';'"
        }));
        let report = failed.error_report();
        assert_eq!(report.class, ErrorClass::CompileError);
        assert_eq!(report.message, "Compilation error");
        assert_eq!(report.context_header, "solution.c");
        assert_eq!(
            report.context_body,
            "Compilation error: solution.c:3: error: expected ';'\n"
        );
        assert_eq!(failed.verdict(), Verdict::CompileError);
    }

    #[test]
    fn test_failed_testcase_report() {
        let mut failed = state(wrong_answer());
        failed.failed_testcase = Some(TestcaseData {
            stdin: "2\n3\n".to_string(),
            expected_output: "5".to_string(),
        });

        let report = failed.error_report();
        assert_eq!(report.class, ErrorClass::WrongAnswer);
        assert_eq!(report.message, "Test Case 1: Wrong Answer");
        assert_eq!(report.context_header, "last test case: 2, 3");
        assert_eq!(report.context_body, "expected output: 5\n");
        assert_eq!(failed.classify().exit_code(), crate::exit_codes::WRONG_ANSWER);
    }

    #[test]
    fn test_paywalled_testcase() {
        let mut failed = state(wrong_answer());
        failed.testcase_message[1] = "Terminated due to timeout".to_string();
        failed.failed_testcase = Some(TestcaseData::default());

        let report = failed.error_report();
        assert_eq!(report.class, ErrorClass::TimeLimitExceeded);
        assert_eq!(
            report.context_header,
            "last test case: [paywalled, use the --purchase flag to unlock]"
        );
        assert_eq!(report.context_body, "expected output: [paywalled]\n");
    }

    #[test]
    fn test_unclassifiable_failures_are_unhandled() {
        let nothing_failed = state(json!({
            "status": "Wrong Answer",
            "testcase_message": ["Success"]
        }));
        let report = nothing_failed.error_report();
        assert_eq!(report.class, ErrorClass::Unhandled);
        assert_eq!(report.message, "Wrong Answer (1 test cases)");
        assert!(!report.context_body.is_empty());

        let odd = state(json!({
            "status": "Failed",
            "testcase_message": ["Memory Limit Exceeded"]
        }));
        let report = odd.error_report();
        assert_eq!(report.class, ErrorClass::Unhandled);
        assert_eq!(report.message, "Test Case 0: Memory Limit Exceeded");
        assert!(matches!(odd.classify(), Report::Failure(_)));
    }

    #[test]
    fn test_submit_fetches_failed_testcase() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(Method::Post, SUBMIT, json!({"model": {"id": 77, "status": "Queued"}}))
            .on(Method::Get, POLL, json!({"model": {"status": "Processing"}}))
            .on(Method::Get, POLL, json!({"model": wrong_answer()}))
            .on(Method::Get, UNLOCKED, json!([1]))
            .on(
                Method::Get,
                TESTCASE,
                json!({"stdin": "2\n3", "expected_output": "5"}),
            );
        let hackerrank = provider(transport);

        let report = hackerrank
            .submit(&solve_me_first(), Language::C, "int main() {}")
            .unwrap();
        assert!(!report.has_succeeded());
        assert_eq!(report.identify(), POLL);
        assert_eq!(report.statistics().max_score, "30pts");

        let error = report.error_report();
        assert_eq!(error.context_header, "last test case: 2, 3");

        let transport = &hackerrank.transport;
        assert_eq!(transport.calls_to(Method::Get, PURCHASE), 0);
        let body = transport.last_body(Method::Post, SUBMIT).unwrap();
        assert_eq!(body["language"], json!("c"));
        assert_eq!(body["contest_slug"], json!("master"));
    }

    #[test]
    fn test_submit_tolerates_null_fields() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(Method::Post, SUBMIT, json!({"model": {"id": 77, "status": "Queued"}}))
            .on(
                Method::Get,
                POLL,
                json!({"model": {
                    "status": "Processing",
                    "testcase_message": null,
                    "codecheck_time": null,
                    "compile_message": null
                }}),
            )
            .on(
                Method::Get,
                POLL,
                json!({"model": {
                    "id": 77,
                    "challenge_id": 9,
                    "status": "Wrong Answer",
                    "compile_status": null,
                    "compile_message": null,
                    "testcase_message": ["Success", "Wrong Answer"],
                    "codecheck_time": null,
                    "individual_test_case_score": null,
                    "display_score": null
                }}),
            )
            .on(Method::Get, UNLOCKED, json!([1]))
            .on(
                Method::Get,
                TESTCASE,
                json!({"stdin": null, "expected_output": "5"}),
            );
        let hackerrank = provider(transport);

        let report = hackerrank
            .submit(&solve_me_first(), Language::C, "int main() {}")
            .unwrap();
        assert_eq!(report.verdict(), Verdict::WrongAnswer);
        let error = report.error_report();
        assert_eq!(error.message, "Test Case 1: Wrong Answer");
        assert_eq!(error.context_body, "expected output: 5\n");
        assert_eq!(hackerrank.transport.calls_to(Method::Get, POLL), 2);
    }

    #[test]
    fn test_locked_testcase_without_purchase() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(Method::Post, SUBMIT, json!({"model": {"id": 77}}))
            .on(Method::Get, POLL, json!({"model": wrong_answer()}))
            .on(Method::Get, UNLOCKED, json!([]));
        let hackerrank = provider(transport);

        let report = hackerrank
            .submit(&solve_me_first(), Language::C, "int main() {}")
            .unwrap();
        assert_eq!(
            report.error_report().context_body,
            "expected output: [paywalled]\n"
        );
        assert_eq!(hackerrank.transport.calls_to(Method::Get, TESTCASE), 0);
    }

    #[test]
    fn test_locked_testcase_is_purchased_when_enabled() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(Method::Post, SUBMIT, json!({"model": {"id": 77}}))
            .on(Method::Get, POLL, json!({"model": wrong_answer()}))
            .on(Method::Get, UNLOCKED, json!([0]))
            .on(Method::Get, PURCHASE, json!({"hacko_amount": 95}))
            .on(
                Method::Get,
                TESTCASE,
                json!({"stdin": "1", "expected_output": "2"}),
            );
        let hackerrank = provider(transport).purchase_testcases(true);

        let report = hackerrank
            .submit(&solve_me_first(), Language::C, "int main() {}")
            .unwrap();
        assert_eq!(report.error_report().context_body, "expected output: 2\n");
        assert_eq!(hackerrank.transport.calls_to(Method::Get, PURCHASE), 1);
    }

    #[test]
    fn test_testcase_fetch_failure_is_not_fatal() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(Method::Post, SUBMIT, json!({"model": {"id": 77}}))
            .on(Method::Get, POLL, json!({"model": wrong_answer()}))
            .fail(Method::Get, UNLOCKED, 500, "oops");
        let report = provider(transport)
            .submit(&solve_me_first(), Language::C, "int main() {}")
            .unwrap();
        let error = report.error_report();
        assert_eq!(error.class, ErrorClass::WrongAnswer);
        assert_eq!(error.context_header, "");
    }

    #[test]
    fn test_server_message_rejects_submission() {
        let transport = ScriptedTransport::new()
            .on(Method::Get, CHALLENGE, challenge_json())
            .on(
                Method::Post,
                SUBMIT,
                json!({"model": null, "message": "You have already submitted"}),
            );
        let result = provider(transport).submit(&solve_me_first(), Language::C, "int main() {}");
        match result {
            Err(Error::SubmitRejected { platform, reason }) => {
                assert_eq!(platform, "hackerrank");
                assert!(reason.contains("already submitted"));
            }
            Err(other) => panic!("unexpected: {:?}", other),
            Ok(_) => panic!("submission should be rejected"),
        }
    }

    #[test]
    fn test_find_next_challenge() {
        let path = "/rest/contests/master/tracks/algorithms/challenges?offset=0&limit=1&filters%5Bdifficulty%5D%5B%5D=easy&filters%5Bstatus%5D%5B%5D=unsolved";
        let transport = ScriptedTransport::new().on(
            Method::Get,
            path,
            json!({"models": [challenge_json()["model"].clone()], "total": 1}),
        );
        let hackerrank = provider(transport);
        let filters = Filters::new()
            .with("track", "algorithms")
            .unwrap()
            .with("difficulty", "easy")
            .unwrap();

        let next = hackerrank.find_next_challenge(&filters).unwrap();
        assert_eq!(next.get("slug").unwrap(), "solve-me-first");
        assert_eq!(next.get("contest").unwrap(), "master");
    }

    #[test]
    fn test_find_next_challenge_needs_track() {
        let hackerrank = provider(ScriptedTransport::new());
        match hackerrank.find_next_challenge(&Filters::new()) {
            Err(Error::NoChallengeFound { reason }) => assert!(reason.contains("data-structures")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_is_signed_in() {
        let transport = ScriptedTransport::new().on(
            Method::Get,
            "/rest/contests/master/notifications/summary",
            json!({"status": false}),
        );
        assert!(!provider(transport).is_signed_in().unwrap());
    }
}

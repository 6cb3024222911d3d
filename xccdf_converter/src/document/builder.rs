use super::{Benchmark, Rule, RuleResult, Selection, BENCHMARK_KEYS};
use crate::config::compile_time::interpreter::{
    MAX_RECORDS_PER_DOCUMENT, MAX_SELECTIONS_PER_PROFILE,
};
use crate::interpreter::{InterpreterError, InterpreterResult};
use crate::stream::AttributeMap;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct TestResultHeader {
    attributes: AttributeMap,
    hostname: Option<String>,
    user: Option<String>,
    profile: Option<String>,
}

/// Accumulates records as the interpreter extracts them
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    header: Option<TestResultHeader>,
    score: Option<String>,
    profiles: BTreeMap<String, Vec<Selection>>,
    rules: Vec<Rule>,
    results: Vec<RuleResult>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the root mapping from TestResult attributes
    pub fn begin_test_result(&mut self, mut attributes: AttributeMap) {
        attributes.remove("id");
        attributes.retain(|key, _| !BENCHMARK_KEYS.contains(&key.as_str()));
        self.header = Some(TestResultHeader {
            attributes,
            ..TestResultHeader::default()
        });
        self.score = None;
    }

    fn header_mut(&mut self) -> &mut TestResultHeader {
        self.header.get_or_insert_with(TestResultHeader::default)
    }

    pub fn set_hostname(&mut self, hostname: String) {
        self.header_mut().hostname = Some(hostname);
    }

    pub fn set_user(&mut self, user: String) {
        self.header_mut().user = Some(user);
    }

    pub fn set_profile(&mut self, profile: String) {
        self.header_mut().profile = Some(profile);
    }

    pub fn set_score(&mut self, score: String) {
        self.score = Some(score);
    }

    /// Later profiles with the same id replace earlier ones
    pub fn add_profile(&mut self, id: String, selections: Vec<Selection>) -> InterpreterResult<()> {
        if selections.len() > MAX_SELECTIONS_PER_PROFILE {
            return Err(InterpreterError::LimitExceeded {
                limit: "selections per profile",
                max: MAX_SELECTIONS_PER_PROFILE,
            });
        }
        self.profiles.insert(id, selections);
        Ok(())
    }

    pub fn push_rule(&mut self, rule: Rule) -> InterpreterResult<()> {
        self.check_record_limit()?;
        self.rules.push(rule);
        Ok(())
    }

    pub fn push_result(&mut self, result: RuleResult) -> InterpreterResult<()> {
        self.check_record_limit()?;
        self.results.push(result);
        Ok(())
    }

    fn check_record_limit(&self) -> InterpreterResult<()> {
        if self.rules.len() + self.results.len() >= MAX_RECORDS_PER_DOCUMENT {
            return Err(InterpreterError::LimitExceeded {
                limit: "records per document",
                max: MAX_RECORDS_PER_DOCUMENT,
            });
        }
        Ok(())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Fails on the first required TestResult field still missing
    pub fn validate_test_result(&self) -> InterpreterResult<()> {
        let header = self
            .header
            .as_ref()
            .ok_or(InterpreterError::MissingRequiredField { field: "TestResult" })?;

        if header.hostname.is_none() {
            return Err(InterpreterError::MissingRequiredField { field: "target" });
        }
        if header.user.is_none() {
            return Err(InterpreterError::MissingRequiredField { field: "identity" });
        }
        if header.profile.is_none() {
            return Err(InterpreterError::MissingRequiredField {
                field: "profile/@idref",
            });
        }
        Ok(())
    }

    pub fn finish(self) -> InterpreterResult<Benchmark> {
        self.validate_test_result()?;
        let header = self
            .header
            .ok_or(InterpreterError::MissingRequiredField { field: "TestResult" })?;

        Ok(Benchmark {
            attributes: header.attributes,
            hostname: header.hostname.unwrap_or_default(),
            user: header.user.unwrap_or_default(),
            profile: header.profile.unwrap_or_default(),
            score: self.score,
            profiles: self.profiles,
            rules: self.rules,
            results: self.results,
        })
    }
}

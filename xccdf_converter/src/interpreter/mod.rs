//! Streaming tag interpreter
//!
//! A single pass over the event stream. The router handles inline tags
//! itself and hands record-starting tags to the bounded consumers, which
//! advance the same cursor to the end of their element.

mod consumers;
mod error;

pub use consumers::{
    collect_selections, consume_rule, consume_rule_result, read_text, TextMode,
};
pub use error::{InterpreterError, InterpreterResult};

use crate::document::{Benchmark, DocumentBuilder};
use crate::logging::codes;
use crate::stream::{Element, EventStream, QualifiedName, XmlEvent, XmlEventReader};
use crate::tags::{XccdfTag, XCCDF_NAMESPACE};
use crate::{log_debug, log_success};
use std::io::BufRead;

/// Build the result document from any buffered XML source
pub fn build_document<R: BufRead>(source: R) -> InterpreterResult<Benchmark> {
    Interpreter::new(XmlEventReader::new(source)).run()
}

pub struct Interpreter<S: EventStream> {
    stream: S,
    builder: DocumentBuilder,
    root: Option<QualifiedName>,
    test_result_depth: Option<usize>,
}

impl<S: EventStream> Interpreter<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            builder: DocumentBuilder::new(),
            root: None,
            test_result_depth: None,
        }
    }

    /// Drive the stream to exhaustion and finish the document
    pub fn run(mut self) -> InterpreterResult<Benchmark> {
        while let Some(event) = self.stream.next_event()? {
            match event {
                XmlEvent::Start(element) => self.dispatch(element)?,
                XmlEvent::End(end) => {
                    if self.test_result_depth == Some(end.depth)
                        && XccdfTag::classify(&end.name) == Some(XccdfTag::TestResult)
                    {
                        self.builder.validate_test_result()?;
                        self.test_result_depth = None;
                    }
                }
                XmlEvent::Text(_) => {}
            }
        }

        let root = self.root.ok_or_else(|| InterpreterError::StructuralMismatch {
            message: "document has no root element".to_string(),
        })?;
        if self.stream.depth() > 0 {
            return Err(InterpreterError::StreamExhausted {
                element: root.to_string(),
            });
        }

        let rules = self.builder.rule_count();
        let results = self.builder.result_count();
        let document = self.builder.finish()?;

        log_success!(
            codes::success::DOCUMENT_INTERPRETED,
            "Result document assembled",
            "profiles" => document.profiles.len(),
            "rules" => rules,
            "results" => results
        );

        Ok(document)
    }

    fn dispatch(&mut self, element: Element) -> InterpreterResult<()> {
        if let Some(root) = &self.root {
            if element.depth == 1 {
                return Err(InterpreterError::StructuralMismatch {
                    message: format!("element {} follows the closed root {}", element.name, root),
                });
            }
        } else if !element.name.is_in(XCCDF_NAMESPACE) {
            return Err(InterpreterError::StructuralMismatch {
                message: format!(
                    "root element {} is not in namespace {}",
                    element.name, XCCDF_NAMESPACE
                ),
            });
        } else {
            self.root = Some(element.name.clone());
        }

        let Some(tag) = XccdfTag::classify(&element.name) else {
            return Ok(());
        };
        let in_test_result = self
            .test_result_depth
            .is_some_and(|depth| element.depth == depth + 1);

        match tag {
            XccdfTag::TestResult => {
                log_debug!("TestResult opened", "depth" => element.depth);
                self.test_result_depth = Some(element.depth);
                self.builder.begin_test_result(element.attributes);
            }
            XccdfTag::Target if in_test_result => {
                let hostname = read_text(&mut self.stream, &element, TextMode::Direct)?;
                self.builder.set_hostname(hostname);
            }
            XccdfTag::Identity if in_test_result => {
                let user = read_text(&mut self.stream, &element, TextMode::Direct)?;
                self.builder.set_user(user);
            }
            XccdfTag::ProfileRef if in_test_result => {
                if let Some(idref) = element.attribute("idref") {
                    self.builder.set_profile(idref.to_string());
                }
            }
            XccdfTag::Profile => {
                let id = element
                    .attribute("id")
                    .ok_or(InterpreterError::MissingAttribute {
                        element: "Profile",
                        attribute: "id",
                    })?
                    .to_string();
                let selections = collect_selections(&mut self.stream, &element)?;
                log_debug!("Profile collected", "id" => id, "selections" => selections.len());
                self.builder.add_profile(id, selections)?;
            }
            XccdfTag::Rule => {
                let rule = consume_rule(&mut self.stream, &element)?;
                self.builder.push_rule(rule)?;
            }
            XccdfTag::Score => {
                let score = read_text(&mut self.stream, &element, TextMode::Direct)?;
                self.builder.set_score(score);
            }
            XccdfTag::RuleResult => {
                let record = consume_rule_result(&mut self.stream, &element)?;
                self.builder.push_result(record)?;
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn scenario() -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Benchmark xmlns="{ns}" id="xccdf_bench">
  <Profile id="P1">
    <title>Standard</title>
    <select idref="R1" selected="true"/>
    <select idref="R2" selected="false"/>
  </Profile>
  <Rule id="R1" severity="medium">
    <title>Check X</title>
    <description>Ensure <em>X</em> is set</description>
    <rationale>X matters</rationale>
  </Rule>
  <TestResult id="TR1" start-time="2019-08-01T10:00:00" test-system="oscap">
    <target>host1</target>
    <identity authenticated="true">root</identity>
    <profile idref="P1"/>
    <rule-result idref="R1" time="12:00">
      <result>pass</result>
      <ident system="http://cce.mitre.org">CCE-1</ident>
    </rule-result>
    <score system="urn:xccdf:scoring:default">87.5</score>
  </TestResult>
</Benchmark>"#,
            ns = XCCDF_NAMESPACE
        )
    }

    #[test]
    fn test_concrete_scenario() {
        let document = build_document(scenario().as_bytes()).unwrap();

        assert_eq!(document.hostname, "host1");
        assert_eq!(document.user, "root");
        assert_eq!(document.profile, "P1");
        assert_eq!(document.score.as_deref(), Some("87.5"));

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(
            json["profiles"],
            serde_json::json!({
                "P1": [
                    { "idref": "R1", "selected": "true" },
                    { "idref": "R2", "selected": "false" }
                ]
            })
        );
        assert_eq!(json["rules"][0]["id"], "R1");
        assert_eq!(json["rules"][0]["severity"], "medium");
        assert_eq!(json["rules"][0]["check"], "Check X");
        assert_eq!(json["rules"][0]["recommendation"], "Ensure X is set");
        assert_eq!(json["rules"][0]["justification"], "X matters");
        assert_eq!(
            json["results"],
            serde_json::json!([{ "idref": "R1", "result": "pass", "ident": "CCE-1" }])
        );
        assert_eq!(json["start-time"], "2019-08-01T10:00:00");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_top_level_keys_without_score() {
        let xml = format!(
            r#"<Benchmark xmlns="{}"><TestResult id="only"><target>h</target><identity>u</identity><profile idref="p"/></TestResult></Benchmark>"#,
            XCCDF_NAMESPACE
        );
        let json = serde_json::to_value(build_document(xml.as_bytes()).unwrap()).unwrap();

        let mut keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["hostname", "profile", "profiles", "results", "rules", "user"]
        );
    }

    #[test]
    fn test_wrong_root_namespace() {
        let xml = r#"<Benchmark xmlns="http://checklists.nist.gov/xccdf/1.1"><TestResult/></Benchmark>"#;
        assert_matches!(
            build_document(xml.as_bytes()),
            Err(InterpreterError::StructuralMismatch { .. })
        );
    }

    #[test]
    fn test_element_after_root_is_rejected() {
        let xml = format!(
            r#"<Benchmark xmlns="{ns}"><TestResult><target>h</target><identity>u</identity><profile idref="p"/></TestResult></Benchmark><Rule xmlns="{ns}" id="late"/>"#,
            ns = XCCDF_NAMESPACE
        );
        assert_matches!(
            build_document(xml.as_bytes()),
            Err(InterpreterError::StructuralMismatch { ref message }) if message.contains("Rule")
        );
    }

    #[test]
    fn test_comments_after_root_are_accepted() {
        let xml = format!(
            r#"<Benchmark xmlns="{}"><TestResult><target>h</target><identity>u</identity><profile idref="p"/></TestResult></Benchmark>
<!-- trailer -->
"#,
            XCCDF_NAMESPACE
        );
        assert!(build_document(xml.as_bytes()).is_ok());
    }

    #[test]
    fn test_empty_document() {
        assert_matches!(
            build_document(r#"<?xml version="1.0"?>"#.as_bytes()),
            Err(InterpreterError::StructuralMismatch { .. })
        );
    }

    #[test]
    fn test_missing_required_field_fails_at_test_result_end() {
        let xml = format!(
            r#"<Benchmark xmlns="{}"><TestResult id="x"><target>h</target><profile idref="p"/></TestResult><Rule id="R1"/></Benchmark>"#,
            XCCDF_NAMESPACE
        );
        assert_matches!(
            build_document(xml.as_bytes()),
            Err(InterpreterError::MissingRequiredField { field: "identity" })
        );
    }

    #[test]
    fn test_no_test_result() {
        let xml = format!(r#"<Benchmark xmlns="{}"><Rule id="R1"/></Benchmark>"#, XCCDF_NAMESPACE);
        assert_matches!(
            build_document(xml.as_bytes()),
            Err(InterpreterError::MissingRequiredField { field: "TestResult" })
        );
    }

    #[test]
    fn test_truncated_document() {
        let full = scenario();
        let truncated = &full[..full.find("<score").unwrap()];
        assert_matches!(
            build_document(truncated.as_bytes()),
            Err(InterpreterError::StreamExhausted { .. })
        );
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let xml = format!(
            r#"<Benchmark xmlns="{ns}" xmlns:ext="urn:ext"><ext:extra><Rule id="R0"/></ext:extra><status>accepted</status><TestResult id="t"><target>h</target><identity>u</identity><profile idref="p"/><target-address>10.0.0.1</target-address></TestResult></Benchmark>"#,
            ns = XCCDF_NAMESPACE
        );
        let document = build_document(xml.as_bytes()).unwrap();

        assert_eq!(document.rules.len(), 1);
        assert_eq!(document.hostname, "h");
    }

    #[test]
    fn test_target_outside_test_result_is_ignored() {
        let xml = format!(
            r#"<Benchmark xmlns="{}"><target>wrong</target><TestResult id="t"><target>right</target><identity>u</identity><profile idref="p"/></TestResult></Benchmark>"#,
            XCCDF_NAMESPACE
        );
        assert_eq!(build_document(xml.as_bytes()).unwrap().hostname, "right");
    }

    #[test]
    fn test_records_preserve_document_order() {
        let xml = format!(
            r#"<Benchmark xmlns="{}"><Rule id="B"/><Rule id="A"/><TestResult id="t"><target>h</target><identity>u</identity><profile idref="p"/><rule-result idref="B"/><rule-result idref="A"/><rule-result idref="C"/></TestResult><Rule id="C"/></Benchmark>"#,
            XCCDF_NAMESPACE
        );
        let document = build_document(xml.as_bytes()).unwrap();

        let rules: Vec<_> = document.rules.iter().map(|r| r.id.as_str()).collect();
        let results: Vec<_> = document.results.iter().filter_map(|r| r.idref()).collect();
        assert_eq!(rules, vec!["B", "A", "C"]);
        assert_eq!(results, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_malformed_xml_surfaces_stream_error() {
        let xml = format!(r#"<Benchmark xmlns="{}"><Rule id="R1"></Benchmark>"#, XCCDF_NAMESPACE);
        assert_matches!(
            build_document(xml.as_bytes()),
            Err(InterpreterError::Stream(_))
        );
    }
}

//! Bounded sub-scan consumers
//!
//! Each consumer is handed the `Start` of its element and pulls from the
//! shared cursor until that element's own `End`, leaving the cursor just
//! past it.

use super::{InterpreterError, InterpreterResult};
use crate::config::compile_time::interpreter::{
    MAX_FIELD_TEXT_LENGTH, MAX_SELECTIONS_PER_PROFILE,
};
use crate::document::{Rule, RuleResult, Selection};
use crate::stream::{Element, EventStream, XmlEvent};
use crate::tags::XccdfTag;

/// Which character data belongs to an element's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Only text that is a direct child of the element
    Direct,
    /// All descendant text in document order
    Deep,
}

fn exhausted(element: &Element) -> InterpreterError {
    InterpreterError::StreamExhausted {
        element: element.name.to_string(),
    }
}

/// Read the text of `element` and consume it through its end tag
pub fn read_text<S: EventStream>(
    stream: &mut S,
    element: &Element,
    mode: TextMode,
) -> InterpreterResult<String> {
    let mut text = String::new();
    let mut current_depth = element.depth;

    loop {
        match stream.next_event()?.ok_or_else(|| exhausted(element))? {
            XmlEvent::Start(child) => current_depth = child.depth,
            XmlEvent::End(end) => {
                if element.is_closed_by(&end) {
                    return Ok(text);
                }
                current_depth = end.depth - 1;
            }
            XmlEvent::Text(chunk) => {
                if mode == TextMode::Deep || current_depth == element.depth {
                    if text.len() + chunk.len() > MAX_FIELD_TEXT_LENGTH {
                        return Err(InterpreterError::LimitExceeded {
                            limit: "bytes of text per field",
                            max: MAX_FIELD_TEXT_LENGTH,
                        });
                    }
                    text.push_str(&chunk);
                }
            }
        }
    }
}

/// Consume a `Rule` element and build its record
pub fn consume_rule<S: EventStream>(stream: &mut S, element: &Element) -> InterpreterResult<Rule> {
    let id = element
        .attribute("id")
        .ok_or(InterpreterError::MissingAttribute {
            element: "Rule",
            attribute: "id",
        })?
        .to_string();
    let severity = element.attribute("severity").unwrap_or("unknown").to_string();

    let mut check = None;
    let mut recommendation = None;
    let mut justification = None;

    loop {
        match stream.next_event()?.ok_or_else(|| exhausted(element))? {
            XmlEvent::Start(child) if child.depth == element.depth + 1 => {
                match XccdfTag::classify(&child.name) {
                    Some(XccdfTag::Title) if check.is_none() => {
                        check = Some(read_text(stream, &child, TextMode::Direct)?);
                    }
                    Some(XccdfTag::Description) if recommendation.is_none() => {
                        recommendation = Some(read_text(stream, &child, TextMode::Deep)?);
                    }
                    Some(XccdfTag::Rationale) if justification.is_none() => {
                        justification = Some(read_text(stream, &child, TextMode::Deep)?);
                    }
                    _ => {}
                }
            }
            XmlEvent::End(end) if element.is_closed_by(&end) => break,
            _ => {}
        }
    }

    Ok(Rule {
        id,
        severity,
        check: check.unwrap_or_default(),
        recommendation: recommendation.unwrap_or_default(),
        justification: justification.unwrap_or_default(),
    })
}

/// Consume a `rule-result` element; nested `result` and `ident` may sit at any depth
pub fn consume_rule_result<S: EventStream>(
    stream: &mut S,
    element: &Element,
) -> InterpreterResult<RuleResult> {
    let mut record = RuleResult::from_attributes(element.attributes.clone());

    loop {
        match stream.next_event()?.ok_or_else(|| exhausted(element))? {
            XmlEvent::Start(child) => match XccdfTag::classify(&child.name) {
                Some(XccdfTag::Result) => {
                    record.result = Some(read_text(stream, &child, TextMode::Direct)?);
                }
                Some(XccdfTag::Ident) => {
                    record.ident = Some(read_text(stream, &child, TextMode::Direct)?);
                }
                _ => {}
            },
            XmlEvent::End(end) if element.is_closed_by(&end) => break,
            _ => {}
        }
    }

    Ok(record)
}

/// Collect the attributes of each direct `select` child of a `Profile`
pub fn collect_selections<S: EventStream>(
    stream: &mut S,
    element: &Element,
) -> InterpreterResult<Vec<Selection>> {
    let mut selections = Vec::new();

    loop {
        match stream.next_event()?.ok_or_else(|| exhausted(element))? {
            XmlEvent::Start(child)
                if child.depth == element.depth + 1
                    && XccdfTag::classify(&child.name) == Some(XccdfTag::Select) =>
            {
                if selections.len() == MAX_SELECTIONS_PER_PROFILE {
                    return Err(InterpreterError::LimitExceeded {
                        limit: "selections per profile",
                        max: MAX_SELECTIONS_PER_PROFILE,
                    });
                }
                selections.push(Selection(child.attributes));
            }
            XmlEvent::End(end) if element.is_closed_by(&end) => break,
            _ => {}
        }
    }

    Ok(selections)
}

use super::executor::{FieldContext, execute};
use super::group::CompiledGroup;
use super::result::ResultSet;
use crate::error::Result;
use crate::extract::FieldExtractor;

/// Validate every declared field of every group against one request.
///
/// Groups run in order. Within a group, fields run query, header, body, json
/// then path parameters, each in declaration order. Only declared fields are
/// extracted. An extraction error aborts the whole evaluation.
pub async fn evaluate<E>(groups: &[CompiledGroup], extractor: &mut E) -> Result<ResultSet>
where
    E: FieldExtractor + ?Sized,
{
    let mut result = ResultSet::new();

    for group in groups {
        for field in group.fields() {
            let raw = extractor.extract_field(field).await?;
            let context = FieldContext::new(field.source, &field.key).with_fallback(group.message());
            let outcome = execute(&field.invocations, raw.as_deref(), &context);

            if let Some(failure) = outcome.failure() {
                tracing::debug!(
                    source = %field.source,
                    field = %field.key,
                    rule = failure.invocation.rule_name().unwrap_or("<anonymous>"),
                    "Field failed validation"
                );
            }

            result.record(field.source, &field.key, outcome);
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::StaticFields;
    use crate::rules::{Rule, RuleLibrary};
    use crate::ruleset;
    use crate::validation::{FieldSource, ValidationGroup, message};
    use serde_json::Value;

    #[tokio::test]
    async fn test_all_fields_valid() {
        let v = RuleLibrary::new();
        let group = ValidationGroup::new()
            .query("q", ruleset![v.is_alpha(), [v.contains(), "abc"]])
            .compile()
            .unwrap();
        let mut fields = StaticFields::new().with(FieldSource::Query, "q", "abcdef");

        let result = evaluate(&[group], &mut fields).await.unwrap();
        assert!(!result.has_error());
    }

    #[tokio::test]
    async fn test_messages_follow_source_then_declaration_order() {
        let v = RuleLibrary::new();
        let group = ValidationGroup::new()
            .header("x-token", v.required())
            .query("b", v.required())
            .query("a", v.required())
            .compile()
            .unwrap();
        let mut fields = StaticFields::new();

        let result = evaluate(&[group], &mut fields).await.unwrap();
        let fields: Vec<&str> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a", "x-token"]);
    }

    #[tokio::test]
    async fn test_groups_fold_into_one_result() {
        let v = RuleLibrary::new();
        let first = ValidationGroup::new()
            .query("q", ruleset![v.required(), message("q is required")])
            .compile()
            .unwrap();
        let second = ValidationGroup::new()
            .header("x-header", Rule::anonymous(|_: &str, _: &[Value]| false))
            .message("header rejected")
            .compile()
            .unwrap();
        let mut fields = StaticFields::new().with(FieldSource::Header, "x-header", "value");

        let result = evaluate(&[first, second], &mut fields).await.unwrap();
        assert_eq!(result.messages(), &["q is required", "header rejected"]);
    }

    #[tokio::test]
    async fn test_only_declared_fields_are_extracted() {
        let v = RuleLibrary::new();
        let group = ValidationGroup::new()
            .query("q", v.required())
            .compile()
            .unwrap();
        let mut fields = StaticFields::new()
            .with(FieldSource::Query, "q", "x")
            .with(FieldSource::Json, "a.b", "y");

        evaluate(&[group], &mut fields).await.unwrap();
        assert_eq!(fields.requested(), &[(FieldSource::Query, "q".to_string())]);
    }
}

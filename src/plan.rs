//! Schema-driven planning.
//!
//! A plan fills schema defaults into the proposed state, keeps computed
//! values the user cannot know from prior state, and diffs the result against
//! prior state. Changing a `force_new` attribute marks the plan as a
//! replacement, which is what keeps in-place updates away from resources that
//! cannot be updated.

use serde_json::{Map, Value};

use crate::schema::Schema;
use crate::types::{AttributeChange, PlanResult};

/// Plan a resource change.
///
/// `prior` is `None` for a create. A null `proposed` state plans a destroy.
pub fn plan_resource(schema: &Schema, prior: Option<&Value>, proposed: Value) -> PlanResult {
    let prior_obj = prior.and_then(Value::as_object);

    if proposed.is_null() {
        let changes = prior_obj
            .map(|obj| {
                sorted_entries(obj)
                    .into_iter()
                    .map(|(k, v)| AttributeChange::removed(k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default();
        return PlanResult::with_changes(Value::Null, changes, false);
    }

    let mut planned = proposed;
    schema.apply_defaults(&mut planned);

    if let (Some(prior_obj), Value::Object(planned_obj)) = (prior_obj, &mut planned) {
        keep_prior_computed(schema, prior_obj, planned_obj);
    }

    let empty = Map::new();
    let before = prior_obj.unwrap_or(&empty);
    let after = planned.as_object().unwrap_or(&empty);

    let mut names: Vec<&String> = schema
        .block
        .attributes
        .keys()
        .chain(schema.block.blocks.keys())
        .collect();
    names.sort();

    let mut changes = Vec::new();
    let mut requires_replace = false;

    for name in names {
        let old = non_null(before.get(name));
        let new = non_null(after.get(name));
        let change = match (old, new) {
            (None, None) => continue,
            (Some(a), Some(b)) if a == b => continue,
            (None, Some(b)) => AttributeChange::added(name.clone(), b.clone()),
            (Some(a), None) => AttributeChange::removed(name.clone(), a.clone()),
            (Some(a), Some(b)) => AttributeChange::modified(name.clone(), a.clone(), b.clone()),
        };

        let force_new = schema
            .block
            .attributes
            .get(name)
            .is_some_and(|attr| attr.force_new);
        if prior.is_some() && force_new {
            requires_replace = true;
        }
        changes.push(change);
    }

    if changes.is_empty() {
        PlanResult::no_change(planned)
    } else {
        PlanResult::with_changes(planned, changes, requires_replace)
    }
}

/// Carry computed values over from prior state where the proposal leaves them unset.
///
/// Blocks the user can configure are never carried over: leaving one out
/// means "back to defaults", which the resource resolves itself.
fn keep_prior_computed(schema: &Schema, prior: &Map<String, Value>, planned: &mut Map<String, Value>) {
    let computed_attrs = schema
        .block
        .attributes
        .iter()
        .filter(|(_, attr)| attr.flags.computed)
        .map(|(name, _)| name);
    let computed_blocks = schema
        .block
        .blocks
        .iter()
        .filter(|(_, nested)| nested.computed && !nested.block.is_configurable())
        .map(|(name, _)| name);

    for name in computed_attrs.chain(computed_blocks) {
        if non_null(planned.get(name)).is_some() {
            continue;
        }
        if let Some(value) = non_null(prior.get(name)) {
            planned.insert(name.clone(), value.clone());
        }
    }
}

fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn sorted_entries(obj: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = obj.iter().filter(|(_, v)| !v.is_null()).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Block, NestedBlock};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::v0()
            .with_attribute("id", Attribute::computed_string())
            .with_attribute("label", Attribute::optional_string().computed())
            .with_attribute("chain", Attribute::required_string().with_force_new())
            .with_attribute("http_url", Attribute::computed_string())
            .with_block(
                "security_options",
                NestedBlock::single(
                    Block::new()
                        .with_attribute("tokens", Attribute::defaulted_bool(true))
                        .with_attribute("ips", Attribute::defaulted_bool(false)),
                )
                .computed(),
            )
    }

    #[test]
    fn test_plan_create_applies_defaults() {
        let plan = plan_resource(
            &schema(),
            None,
            json!({"chain": "eth", "security_options": {"ips": true}}),
        );

        assert!(!plan.requires_replace);
        assert_eq!(
            plan.planned_state["security_options"],
            json!({"tokens": true, "ips": true})
        );
        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["chain", "security_options"]);
    }

    #[test]
    fn test_plan_update_keeps_computed_values() {
        let prior = json!({
            "id": "ep-1",
            "label": "primary",
            "chain": "eth",
            "http_url": "https://x.quiknode.pro/abc"
        });
        let plan = plan_resource(&schema(), Some(&prior), json!({"chain": "eth"}));

        assert!(!plan.has_changes());
        assert_eq!(plan.planned_state["id"], "ep-1");
        assert_eq!(plan.planned_state["label"], "primary");
        assert_eq!(plan.planned_state["http_url"], "https://x.quiknode.pro/abc");
    }

    #[test]
    fn test_plan_update_drops_removed_options_block() {
        let prior = json!({
            "id": "ep-1",
            "chain": "eth",
            "security_options": {"tokens": true, "ips": true}
        });
        let plan = plan_resource(&schema(), Some(&prior), json!({"chain": "eth"}));

        assert!(plan.planned_state.get("security_options").is_none());
        assert!(!plan.requires_replace);
        assert_eq!(
            plan.changes,
            vec![AttributeChange::removed(
                "security_options",
                json!({"tokens": true, "ips": true})
            )]
        );
    }

    #[test]
    fn test_plan_keeps_provider_filled_blocks() {
        let schema = schema().with_block(
            "rate_limits",
            NestedBlock::single(Block::new().with_attribute("rps", Attribute::computed_int64())).computed(),
        );
        let prior = json!({"id": "ep-1", "chain": "eth", "rate_limits": {"rps": 25}});
        let plan = plan_resource(&schema, Some(&prior), json!({"chain": "eth"}));

        assert!(!plan.has_changes());
        assert_eq!(plan.planned_state["rate_limits"], json!({"rps": 25}));
    }

    #[test]
    fn test_plan_label_change_is_in_place() {
        let prior = json!({"id": "ep-1", "label": "a", "chain": "eth"});
        let plan = plan_resource(&schema(), Some(&prior), json!({"chain": "eth", "label": "b"}));

        assert!(!plan.requires_replace);
        assert_eq!(
            plan.changes,
            vec![AttributeChange::modified("label", json!("a"), json!("b"))]
        );
    }

    #[test]
    fn test_plan_force_new_change_replaces() {
        let prior = json!({"id": "ep-1", "chain": "eth"});
        let plan = plan_resource(&schema(), Some(&prior), json!({"chain": "sol"}));
        assert!(plan.requires_replace);
    }

    #[test]
    fn test_plan_destroy() {
        let prior = json!({"id": "ep-1", "chain": "eth", "label": null});
        let plan = plan_resource(&schema(), Some(&prior), Value::Null);

        assert!(plan.planned_state.is_null());
        let paths: Vec<_> = plan.changes.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["chain", "id"]);
        assert!(plan.changes.iter().all(|c| c.after.is_none()));
    }
}

//! Detail call chains
//!
//! A primary item can be enriched by a sequence of detail calls. Each step
//! passes the current item as a parameter, resolves the step's response path,
//! and advances to the first candidate. A step marked `store_parent`
//! remembers the item it started with so a later step can pass it again via
//! an `extra_params` entry set to `stored`.

use super::dispatch::Invoker;
use super::item::RawItem;
use super::path;
use super::registry::{DetailStep, ParamSource, Params};
use crate::error::InvokeError;

/// Where calls for one resource type and region go.
#[derive(Clone, Copy)]
pub struct CallContext<'a> {
    pub invoker: &'a dyn Invoker,
    pub service: &'a str,
    pub region: &'a str,
}

impl<'a> CallContext<'a> {
    pub fn new(invoker: &'a dyn Invoker, service: &'a str, region: &'a str) -> Self {
        Self {
            invoker,
            service,
            region,
        }
    }

    pub fn call(&self, operation: &str, params: &Params) -> Result<RawItem, InvokeError> {
        self.invoker
            .invoke(self.service, self.region, operation, params)
    }
}

/// Build the parameters for one step.
fn step_params(step: &DetailStep, current: &RawItem, stored: Option<&RawItem>) -> Params {
    let mut params = Params::new();
    params.insert(step.param.clone(), current.clone());

    for (name, source) in &step.extra_params {
        let value = match source {
            ParamSource::Stored => match stored {
                Some(item) => item.clone(),
                None => {
                    tracing::debug!(
                        "step {} wants stored item for '{}' but none was stored",
                        step.name,
                        name
                    );
                    RawItem::Absent
                }
            },
            ParamSource::Current => current.clone(),
        };
        params.insert(name.clone(), value);
    }

    params
}

/// Run `steps` starting from `primary`.
///
/// Returns `Ok(None)` when a `skip_empty` step resolves nothing. A step
/// without `skip_empty` that resolves nothing leaves the current item as is,
/// and the next step is called with that same item.
pub fn run_chain(
    ctx: &CallContext<'_>,
    primary: &RawItem,
    steps: &[DetailStep],
) -> Result<Option<RawItem>, InvokeError> {
    let mut current = primary.clone();
    let mut stored: Option<RawItem> = None;

    for step in steps {
        if step.store_parent {
            stored = Some(current.clone());
        }
        let params = step_params(step, &current, stored.as_ref());

        let response = ctx.call(&step.name, &params)?;
        let candidates = path::resolve(&response, &step.response_key);

        match candidates.first() {
            Some(next) => current = (*next).clone(),
            None if step.skip_empty => {
                tracing::debug!("{}: empty result, dropping item", step.name);
                return Ok(None);
            }
            None => {
                tracing::debug!("{}: empty result, keeping current item", step.name);
            }
        }
    }

    Ok(Some(current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::dispatch::OperationTable;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    fn step(name: &str, param: &str, response_key: &str) -> DetailStep {
        DetailStep {
            name: name.to_string(),
            param: param.to_string(),
            response_key: response_key.to_string(),
            store_parent: false,
            extra_params: BTreeMap::new(),
            skip_empty: false,
        }
    }

    type CallLog = Arc<Mutex<Vec<(String, serde_json::Value)>>>;

    fn recording(table: OperationTable, log: &CallLog, ops: &[(&str, serde_json::Value)]) -> OperationTable {
        let mut table = table;
        for (op, response) in ops {
            let log = Arc::clone(log);
            let name = op.to_string();
            let response = response.clone();
            table.register("svc", op, move |_, params| {
                let rendered: serde_json::Map<_, _> =
                    params.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
                log.lock().unwrap().push((name.clone(), rendered.into()));
                Ok(RawItem::from(response.clone()))
            });
        }
        table
    }

    #[test]
    fn test_single_step_advances() {
        let log = CallLog::default();
        let table = recording(
            OperationTable::new(),
            &log,
            &[("get_function", json!({"Configuration": {"FunctionName": "f", "Runtime": "python3.12"}}))],
        );
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let result = run_chain(
            &ctx,
            &RawItem::from("f"),
            &[step("get_function", "FunctionName", "Configuration")],
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.get("Runtime").and_then(RawItem::as_str), Some("python3.12"));
        assert_eq!(log.lock().unwrap()[0].1, json!({"FunctionName": "f"}));
    }

    #[test]
    fn test_stored_parent_is_step_input() {
        let log = CallLog::default();
        let table = recording(
            OperationTable::new(),
            &log,
            &[
                ("list_nodegroups", json!({"nodegroups": ["ng-a", "ng-b"]})),
                ("describe_nodegroup", json!({"nodegroup": {"nodegroupName": "ng-a"}})),
            ],
        );
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let mut first = step("list_nodegroups", "clusterName", "nodegroups.[]");
        first.store_parent = true;
        let mut second = step("describe_nodegroup", "nodegroupName", "nodegroup");
        second
            .extra_params
            .insert("clusterName".to_string(), ParamSource::Stored);

        let result = run_chain(&ctx, &RawItem::from("prod"), &[first, second])
            .unwrap()
            .unwrap();
        assert_eq!(result.get("nodegroupName").and_then(RawItem::as_str), Some("ng-a"));

        let calls = log.lock().unwrap();
        assert_eq!(calls[1].0, "describe_nodegroup");
        assert_eq!(
            calls[1].1,
            json!({"nodegroupName": "ng-a", "clusterName": "prod"})
        );
    }

    #[test]
    fn test_current_extra_param() {
        let log = CallLog::default();
        let table = recording(OperationTable::new(), &log, &[("get", json!({"X": 1}))]);
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let mut s = step("get", "Id", "X");
        s.extra_params.insert("Also".to_string(), ParamSource::Current);
        run_chain(&ctx, &RawItem::from("i-1"), &[s]).unwrap();

        assert_eq!(log.lock().unwrap()[0].1, json!({"Id": "i-1", "Also": "i-1"}));
    }

    #[test]
    fn test_skip_empty_drops_item() {
        let log = CallLog::default();
        let table = recording(
            OperationTable::new(),
            &log,
            &[("list_nodegroups", json!({"nodegroups": []})), ("describe", json!({}))],
        );
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let mut first = step("list_nodegroups", "clusterName", "nodegroups.[]");
        first.skip_empty = true;
        let result = run_chain(
            &ctx,
            &RawItem::from("c"),
            &[first, step("describe", "nodegroupName", "nodegroup")],
        )
        .unwrap();

        assert!(result.is_none());
        assert_eq!(log.lock().unwrap().len(), 1, "chain stops at the empty step");
    }

    #[test]
    fn test_empty_without_skip_keeps_current() {
        let log = CallLog::default();
        let table = recording(
            OperationTable::new(),
            &log,
            &[
                ("optional", json!({"Nothing": []})),
                ("describe", json!({"Detail": {"Id": "x"}})),
            ],
        );
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let result = run_chain(
            &ctx,
            &RawItem::from("x"),
            &[step("optional", "Id", "Nothing.[]"), step("describe", "Id", "Detail")],
        )
        .unwrap()
        .unwrap();

        assert_eq!(result.get("Id").and_then(RawItem::as_str), Some("x"));
        let calls = log.lock().unwrap();
        assert_eq!(calls[1].1, json!({"Id": "x"}), "next step sees the unchanged item");
    }

    #[test]
    fn test_empty_last_step_returns_previous_item() {
        let table = OperationTable::new().with("svc", "optional", |_, _| Ok(RawItem::from(json!({}))));
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let primary = RawItem::from(json!({"Id": "p"}));
        let result = run_chain(&ctx, &primary, &[step("optional", "Id", "Detail")]).unwrap();
        assert_eq!(result, Some(primary));
    }

    #[test]
    fn test_call_failure_propagates() {
        let table = OperationTable::new().with("svc", "get", |_, _| {
            Err(InvokeError::new("ResourceNotFoundException", "gone"))
        });
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let err = run_chain(&ctx, &RawItem::from("x"), &[step("get", "Id", "X")]).unwrap_err();
        assert_eq!(err.code, "ResourceNotFoundException");
    }

    #[test]
    fn test_stored_without_store_parent_is_absent() {
        let log = CallLog::default();
        let table = recording(OperationTable::new(), &log, &[("get", json!({"X": 1}))]);
        let ctx = CallContext::new(&table, "svc", "us-east-1");

        let mut s = step("get", "Id", "X");
        s.extra_params.insert("Parent".to_string(), ParamSource::Stored);
        run_chain(&ctx, &RawItem::from("i-1"), &[s]).unwrap();

        assert_eq!(log.lock().unwrap()[0].1, json!({"Id": "i-1", "Parent": null}));
    }
}

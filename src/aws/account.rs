//! Account identity and region discovery

use crate::error::InvokeError;
use crate::resource::{path, Invoker, Params, RawItem, DEFAULT_REGION};

/// Look up the account the credentials belong to.
pub fn account_id(invoker: &dyn Invoker) -> Result<String, InvokeError> {
    let response = invoker.invoke("sts", DEFAULT_REGION, "get_caller_identity", &Params::new())?;

    path::resolve_first(&response, "Account")
        .and_then(RawItem::as_str)
        .map(str::to_string)
        .ok_or_else(|| InvokeError::new("InvalidResponse", "caller identity has no Account"))
}

/// List enabled regions, falling back to the default region.
pub fn list_regions(invoker: &dyn Invoker) -> Vec<String> {
    let response = match invoker.invoke("ec2", DEFAULT_REGION, "describe_regions", &Params::new()) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Failed to list regions: {}, using {}", e.code, DEFAULT_REGION);
            return vec![DEFAULT_REGION.to_string()];
        }
    };

    let regions: Vec<String> = path::resolve(&response, "Regions.[].RegionName")
        .into_iter()
        .filter_map(RawItem::as_str)
        .map(str::to_string)
        .collect();

    if regions.is_empty() {
        tracing::warn!("No regions returned, using {}", DEFAULT_REGION);
        return vec![DEFAULT_REGION.to_string()];
    }

    tracing::info!("Loaded {} regions", regions.len());
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::OperationTable;
    use serde_json::json;

    #[test]
    fn test_account_id() {
        let table = OperationTable::new().with("sts", "get_caller_identity", |_, _| {
            Ok(RawItem::from(json!({"Account": "123456789012", "Arn": "arn:aws:iam::123456789012:user/a"})))
        });
        assert_eq!(account_id(&table).unwrap(), "123456789012");
    }

    #[test]
    fn test_account_id_missing() {
        let table = OperationTable::new()
            .with("sts", "get_caller_identity", |_, _| Ok(RawItem::from(json!({}))));
        assert_eq!(account_id(&table).unwrap_err().code, "InvalidResponse");
    }

    #[test]
    fn test_list_regions_in_order() {
        let table = OperationTable::new().with("ec2", "describe_regions", |_, _| {
            Ok(RawItem::from(json!({"Regions": [
                {"RegionName": "eu-west-1", "Endpoint": "ec2.eu-west-1.amazonaws.com"},
                {"RegionName": "us-east-1"},
                {"RegionName": "ap-south-1"}
            ]})))
        });
        assert_eq!(list_regions(&table), vec!["eu-west-1", "us-east-1", "ap-south-1"]);
    }

    #[test]
    fn test_list_regions_falls_back() {
        let failing = OperationTable::new();
        assert_eq!(list_regions(&failing), vec![DEFAULT_REGION]);

        let empty = OperationTable::new()
            .with("ec2", "describe_regions", |_, _| Ok(RawItem::from(json!({"Regions": []}))));
        assert_eq!(list_regions(&empty), vec![DEFAULT_REGION]);
    }
}

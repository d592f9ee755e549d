use serde::{Deserialize, Serialize};

/// One workspace from a listing endpoint. Which optional fields are populated
/// depends on the provider: PowerVS fills id/name/status/location, Schematics
/// additionally fills resource_group/created_at/created_by.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct WorkspaceRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub resource_group: Option<String>,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
}

/// Renders records as numbered, blank-line-separated blocks, listing present
/// fields only. An empty slice renders as an empty string.
pub fn format_workspaces(records: &[WorkspaceRecord]) -> String {
    let mut output = Vec::new();
    for (i, record) in records.iter().enumerate() {
        output.push(format!("Workspace {}:", i + 1));
        push_field(&mut output, "Name", &record.name);
        push_field(&mut output, "ID", &record.id);
        push_field(&mut output, "Resource Group", &record.resource_group);
        push_field(&mut output, "Location", &record.location);
        push_field(&mut output, "Status", &record.status);
        push_field(&mut output, "Created At", &record.created_at);
        push_field(&mut output, "Created By", &record.created_by);
        output.push(String::new());
    }
    output.join("\n")
}

fn push_field(output: &mut Vec<String>, label: &str, value: &Option<String>) {
    if let Some(value) = value {
        output.push(format!("- {label}: {value}"));
    }
}

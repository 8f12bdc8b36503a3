//! MCP Tool implementations

use crate::rpc::{McpError, INTERNAL_ERROR};
use crate::state::ServerState;
use dox_core::policies::from_args;
use dox_core::{
    all_templates, approve_policy, archive_policy, create_policy, get_policy, get_policy_history,
    list_categories, list_policies, list_sports, list_tags, search_by_category,
    search_by_keywords, search_by_sport, search_policies, stored_templates, update_policy,
    ManualSelection, PolicyCategory, PolicyLookup,
};
use serde::Serialize;
use serde_json::{json, Value};

/// List all available tools with their schemas
#[must_use = "returns list of available MCP tools"]
pub fn list_tools() -> Vec<Value> {
    let categories: Vec<&str> = PolicyCategory::ALL.iter().map(|c| c.as_str()).collect();
    let selection_schema = json!({
        "type": "object",
        "properties": {
            "title": { "type": "string", "description": "Manual title" },
            "sport_id": { "type": "integer", "description": "Sport to include (multi-sport policies are always added)" },
            "policy_ids": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Specific policies to include; overrides sport and category filters"
            },
            "categories": {
                "type": "array",
                "items": { "type": "string", "enum": categories },
                "description": "Categories to include"
            },
            "include_toc": { "type": "boolean", "default": true },
            "include_index": { "type": "boolean", "default": true },
            "template": { "type": "string", "description": "Template id or title" },
            "format": { "type": "string", "enum": ["pdf", "preview"], "default": "pdf" }
        },
        "required": ["title"]
    });

    let statuses = ["draft", "current", "archived", "pending_approval"];
    let pagination_schema = json!({
        "type": "object",
        "properties": {
            "page": { "type": "integer", "minimum": 1, "default": 1 },
            "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 20 }
        }
    });
    let id_schema = json!({ "type": ["string", "integer"], "description": "Policy ID" });
    let number_schema = json!({ "type": "string", "pattern": "^[A-Z]+-[A-Z]+-\\d{3}$" });
    let date_schema = json!({ "type": "string", "format": "date" });

    vec![
        json!({
            "name": "list_categories",
            "description": "Get all policy categories with optional counts",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "include_counts": { "type": "boolean", "default": false, "description": "Include policy counts per category" },
                    "sport_id": { "type": "integer", "description": "Filter counts by sport" }
                }
            }
        }),
        json!({
            "name": "list_sports",
            "description": "Get all available sports in the system",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "active_only": { "type": "boolean", "default": true, "description": "Only return active sports" }
                }
            }
        }),
        json!({
            "name": "get_policy",
            "description": "Retrieve a single policy by ID or policy number",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "policy_number": { "type": "string", "pattern": "^[A-Z]+-[A-Z]+-\\d{3}$" }
                }
            }
        }),
        json!({
            "name": "list_manual_templates",
            "description": "Get available manual templates",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "get_manual_templates",
            "description": "Get available manual templates with their configurations",
            "inputSchema": { "type": "object", "properties": {} }
        }),
        json!({
            "name": "generate_manual",
            "description": "Generate a PDF manual from selected policies",
            "inputSchema": selection_schema.clone()
        }),
        json!({
            "name": "preview_manual",
            "description": "Preview manual structure before generating",
            "inputSchema": selection_schema
        }),
        json!({
            "name": "create_policy",
            "description": "Create a new draft policy",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string", "maxLength": 255 },
                    "short_name": { "type": "string", "maxLength": 100 },
                    "category": { "type": "string", "enum": categories },
                    "sport_id": { "type": "integer", "description": "Owning sport; omit for multi-sport" },
                    "policy_number": number_schema,
                    "content_text": { "type": "string" },
                    "content_html": { "type": "string" },
                    "summary": { "type": "string" },
                    "effective_date": date_schema,
                    "expiration_date": date_schema,
                    "tags": { "type": "array", "items": { "type": "string" } },
                    "keywords": { "type": "array", "items": { "type": "string" } },
                    "applies_to_sports": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["title", "short_name", "category", "policy_number", "content_text", "effective_date"]
            }
        }),
        json!({
            "name": "update_policy",
            "description": "Update an existing policy, recording the prior revision",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": id_schema,
                    "updates": {
                        "type": "object",
                        "description": "Fields to change; content_text changes bump the minor version",
                        "properties": {
                            "title": { "type": "string" },
                            "short_name": { "type": "string" },
                            "category": { "type": "string", "enum": categories },
                            "sport_id": { "type": ["integer", "null"] },
                            "policy_number": number_schema,
                            "content_text": { "type": "string" },
                            "content_html": { "type": "string" },
                            "summary": { "type": "string" },
                            "effective_date": date_schema,
                            "expiration_date": { "type": ["string", "null"], "format": "date" },
                            "tags": { "type": "array", "items": { "type": "string" } },
                            "keywords": { "type": "array", "items": { "type": "string" } },
                            "applies_to_sports": { "type": "array", "items": { "type": "string" } },
                            "status": { "type": "string", "enum": statuses }
                        }
                    },
                    "change_summary": { "type": "string" }
                },
                "required": ["id", "updates"]
            }
        }),
        json!({
            "name": "archive_policy",
            "description": "Archive a policy",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": id_schema,
                    "reason": { "type": "string" }
                },
                "required": ["id"]
            }
        }),
        json!({
            "name": "approve_policy",
            "description": "Approve a draft or pending policy and make it current",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "id": id_schema,
                    "approver_notes": { "type": "string" }
                },
                "required": ["id"]
            }
        }),
        json!({
            "name": "list_policies",
            "description": "List policies with filters, sorting and pagination",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "filters": {
                        "type": "object",
                        "properties": {
                            "sport_id": { "type": "integer" },
                            "category": { "type": "string", "enum": categories },
                            "status": { "type": "string", "enum": statuses, "default": "current" },
                            "effective_after": date_schema,
                            "effective_before": date_schema
                        }
                    },
                    "sort_by": {
                        "type": "string",
                        "enum": ["policy_number", "title", "updated_at", "effective_date"],
                        "default": "policy_number"
                    },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"], "default": "asc" },
                    "page": { "type": "integer", "minimum": 1, "default": 1 },
                    "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 20 }
                }
            }
        }),
        json!({
            "name": "get_policy_history",
            "description": "Get the revision history of a policy, newest first",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "policy_id": id_schema,
                    "limit": { "type": "integer", "minimum": 1, "maximum": 50, "default": 10 }
                },
                "required": ["policy_id"]
            }
        }),
        json!({
            "name": "list_tags",
            "description": "Get tags used by current policies with usage counts",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "sport_id": { "type": "integer" },
                    "limit": { "type": "integer", "minimum": 1, "maximum": 100, "default": 50 }
                }
            }
        }),
        json!({
            "name": "search_policies",
            "description": "Search policies whose title, summary or content contain every query term",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "filters": {
                        "type": "object",
                        "properties": {
                            "sport_ids": { "type": "array", "items": { "type": "integer" } },
                            "categories": { "type": "array", "items": { "type": "string", "enum": categories } },
                            "status": { "type": "string", "enum": statuses, "default": "current" },
                            "tags": { "type": "array", "items": { "type": "string" } }
                        }
                    },
                    "pagination": pagination_schema.clone()
                },
                "required": ["query"]
            }
        }),
        json!({
            "name": "search_by_sport",
            "description": "Get current policies for a sport by ID or abbreviation",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "sport_id": { "type": "integer" },
                    "sport_abbreviation": { "type": "string" },
                    "include_multi_sport": { "type": "boolean", "default": true },
                    "pagination": pagination_schema.clone()
                }
            }
        }),
        json!({
            "name": "search_by_category",
            "description": "Get current policies in a category",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "category": { "type": "string", "enum": categories },
                    "sport_id": { "type": "integer" },
                    "pagination": pagination_schema.clone()
                },
                "required": ["category"]
            }
        }),
        json!({
            "name": "search_by_keywords",
            "description": "Get current policies sharing any or all of the given keywords",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "keywords": { "type": "array", "items": { "type": "string" }, "minItems": 1 },
                    "match_all": { "type": "boolean", "default": false },
                    "pagination": pagination_schema
                },
                "required": ["keywords"]
            }
        }),
    ]
}

/// Call a tool by name
///
/// # Errors
///
/// Unknown tools map to `-32601`; domain failures carry the code of their
/// [`dox_core::DoxError`] variant.
#[must_use = "this function returns a Result that should be handled"]
pub fn call_tool(state: &ServerState, name: &str, args: Value) -> Result<Value, McpError> {
    log::debug!("tools/call {name}");
    match name {
        "list_categories" => {
            let include_counts = bool_arg(&args, "include_counts", false)?;
            let sport_id = int_arg(&args, "sport_id")?;
            let categories = list_categories(state.store(), include_counts, sport_id)?;
            Ok(json!({ "categories": to_json(&categories)? }))
        }
        "list_sports" => {
            let active_only = bool_arg(&args, "active_only", true)?;
            let sports = list_sports(state.store(), active_only)?;
            Ok(json!({ "total": sports.len(), "sports": to_json(&sports)? }))
        }
        "get_policy" => {
            let lookup = PolicyLookup::from_value(&args)?;
            to_json(&get_policy(state.store(), &lookup)?)
        }
        "list_manual_templates" => {
            let templates = stored_templates(state.store())?;
            Ok(json!({ "templates": to_json(&templates)? }))
        }
        "get_manual_templates" => {
            let templates = all_templates(state.store())?;
            Ok(json!({ "templates": to_json(&templates)? }))
        }
        "generate_manual" => {
            let selection = ManualSelection::from_value(args)?;
            to_json(&state.service().generate_manual(&selection)?)
        }
        "preview_manual" => {
            let selection = ManualSelection::from_value(args)?;
            to_json(&state.service().preview_manual(&selection)?)
        }
        "create_policy" => to_json(&create_policy(state.store(), from_args(args)?)?),
        "update_policy" => to_json(&update_policy(state.store(), from_args(args)?)?),
        "archive_policy" => to_json(&archive_policy(state.store(), from_args(args)?)?),
        "approve_policy" => to_json(&approve_policy(state.store(), from_args(args)?)?),
        "list_policies" => to_json(&list_policies(state.store(), from_args(args)?)?),
        "get_policy_history" => to_json(&get_policy_history(state.store(), from_args(args)?)?),
        "list_tags" => to_json(&list_tags(state.store(), from_args(args)?)?),
        "search_policies" => to_json(&search_policies(state.store(), from_args(args)?)?),
        "search_by_sport" => to_json(&search_by_sport(state.store(), from_args(args)?)?),
        "search_by_category" => to_json(&search_by_category(state.store(), from_args(args)?)?),
        "search_by_keywords" => to_json(&search_by_keywords(state.store(), from_args(args)?)?),
        _ => Err(McpError::method_not_found(format!("Tool \"{name}\" not found"))),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, McpError> {
    serde_json::to_value(value).map_err(|e| McpError::new(INTERNAL_ERROR, e.to_string()))
}

fn bool_arg(args: &Value, key: &str, default: bool) -> Result<bool, McpError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(McpError::invalid_params(format!("{key} must be a boolean"))),
    }
}

fn int_arg(args: &Value, key: &str) -> Result<Option<i64>, McpError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("{key} must be an integer"))),
    }
}

//! MCP prompt templates

use crate::rpc::{McpError, INVALID_REQUEST};
use crate::state::ServerState;
use dox_core::{find_sport_by_abbreviation, list_sports, DoxError, PolicyCategory};
use serde_json::{json, Value};
use std::fmt::Write as _;

const SEARCH: &str = "dox_search";
const GENERATE_MANUAL: &str = "dox_generate_manual";
const QUICK_FIND: &str = "dox_quick_find";
const POLICY_SUMMARY: &str = "dox_policy_summary";
const COMPLIANCE_CHECK: &str = "dox_compliance_check";

/// Categories every sport is expected to cover.
const REQUIRED_CATEGORIES: [PolicyCategory; 7] = [
    PolicyCategory::SchedulingPolicies,
    PolicyCategory::Officiating,
    PolicyCategory::PlayingRules,
    PolicyCategory::EquipmentSpecifications,
    PolicyCategory::VenueRequirements,
    PolicyCategory::SafetyProtocols,
    PolicyCategory::ChampionshipProcedures,
];

fn argument(name: &str, description: &str, required: bool) -> Value {
    json!({ "name": name, "description": description, "required": required })
}

/// List all available prompts
#[must_use = "returns list of available MCP prompts"]
pub fn list_prompts() -> Vec<Value> {
    vec![
        json!({
            "name": SEARCH,
            "description": "Interactive policy search workflow",
            "arguments": [argument("initial_query", "Optional initial search query", false)]
        }),
        json!({
            "name": GENERATE_MANUAL,
            "description": "Step-by-step manual generation workflow",
            "arguments": [argument("sport", "Optional sport abbreviation to pre-filter", false)]
        }),
        json!({
            "name": QUICK_FIND,
            "description": "Quick policy lookup by number or title",
            "arguments": [argument("query", "Policy number or partial title", true)]
        }),
        json!({
            "name": POLICY_SUMMARY,
            "description": "Generate a summary report of policies",
            "arguments": [
                argument("sport", "Sport abbreviation (optional)", false),
                argument("category", "Policy category (optional)", false)
            ]
        }),
        json!({
            "name": COMPLIANCE_CHECK,
            "description": "Check policy compliance and coverage",
            "arguments": [argument("sport", "Sport to check compliance for", true)]
        }),
    ]
}

fn message(role: &str, text: String) -> Value {
    json!({ "role": role, "content": { "type": "text", "text": text } })
}

fn optional_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn required_arg<'a>(args: &'a Value, key: &str) -> Result<&'a str, McpError> {
    optional_arg(args, key)
        .ok_or_else(|| McpError::invalid_params(format!("Missing required argument: {key}")))
}

/// Expand a prompt into its messages
///
/// # Errors
///
/// `-32600` for an unknown prompt, `-32602` for a missing required
/// argument; store failures otherwise.
pub fn get_prompt(state: &ServerState, name: &str, args: &Value) -> Result<Value, McpError> {
    let (description, messages) = match name {
        SEARCH => (
            "Interactive policy search workflow",
            search_messages(state, optional_arg(args, "initial_query")),
        ),
        GENERATE_MANUAL => {
            let text = generate_manual_text(state, optional_arg(args, "sport"))?;
            (
                "Step-by-step manual generation workflow",
                vec![message("assistant", text)],
            )
        }
        QUICK_FIND => (
            "Quick policy lookup by number or title",
            quick_find_messages(required_arg(args, "query")?),
        ),
        POLICY_SUMMARY => (
            "Generate a summary report of policies",
            vec![message(
                "assistant",
                policy_summary_text(optional_arg(args, "sport"), optional_arg(args, "category")),
            )],
        ),
        COMPLIANCE_CHECK => {
            let text = compliance_check_text(state, required_arg(args, "sport")?)?;
            ("Check policy compliance and coverage", vec![message("assistant", text)])
        }
        _ => {
            return Err(McpError::new(
                INVALID_REQUEST,
                format!("Prompt \"{name}\" not found"),
            ))
        }
    };
    Ok(json!({ "description": description, "messages": messages }))
}

fn search_messages(state: &ServerState, initial_query: Option<&str>) -> Vec<Value> {
    let organization = &state.settings().branding.organization;
    let opening = match initial_query {
        Some(query) => format!("Searching for: \"{query}\""),
        None => "What would you like to search for?".to_string(),
    };
    let mut messages = vec![message(
        "assistant",
        format!(
            "Welcome to DoX Policy Search! I'll help you find {organization} policies.\n\n\
             {opening}\n\n\
             You can search by:\n\
             - Keywords or phrases\n\
             - Policy numbers (e.g., BSB-OFF-001)\n\
             - Sports (e.g., \"basketball\", \"soccer\")\n\
             - Categories (e.g., \"officiating\", \"scheduling\")\n\n\
             Try combining terms for more specific results, like \"basketball officiating\" \
             or \"soccer venue requirements\"."
        ),
    )];
    if let Some(query) = initial_query {
        messages.push(message(
            "user",
            format!("Search for policies containing: {query}"),
        ));
    }
    messages
}

fn generate_manual_text(state: &ServerState, sport: Option<&str>) -> Result<String, McpError> {
    let sports = list_sports(state.store(), true)?;

    let mut text = String::from(
        "Let's create a custom manual! I'll guide you through the process.\n\n\
         **Step 1: Choose your manual type**\n\n\
         1. **Sport-specific manual** - All policies for a single sport\n\
         2. **Category-based manual** - Policies from specific categories across all sports\n\
         3. **Custom selection** - Hand-pick specific policies\n",
    );
    if let Some(sport) = sport {
        let _ = write!(text, "\nPre-selected sport: {sport}\n");
    }

    text.push_str("\n**Available Sports:**\n");
    for s in &sports {
        let _ = writeln!(text, "- {} ({})", s.name, s.abbreviation);
    }

    text.push_str("\n**Available Categories:**\n");
    for category in PolicyCategory::ALL {
        let _ = writeln!(text, "- {} (`{}`)", category.label(), category.as_str());
    }

    text.push_str("\nWhat type of manual would you like to create?");
    Ok(text)
}

fn quick_find_messages(query: &str) -> Vec<Value> {
    vec![
        message("user", format!("Find policy: {query}")),
        message(
            "assistant",
            format!(
                "Searching for policy matching \"{query}\"...\n\n\
                 I'll check:\n\
                 1. Exact policy number matches\n\
                 2. Partial policy number matches\n\
                 3. Title matches\n\
                 4. Content containing this term\n\n\
                 Use the get_policy tool with the policy number for full details."
            ),
        ),
    ]
}

fn policy_summary_text(sport: Option<&str>, category: Option<&str>) -> String {
    let filters: Vec<String> = [("Sport", sport), ("Category", category)]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}")))
        .collect();
    let scope = if filters.is_empty() {
        "**Scope:** All policies".to_string()
    } else {
        format!("**Filters:** {}", filters.join(", "))
    };
    format!(
        "I'll generate a comprehensive policy summary report.\n\n\
         {scope}\n\n\
         The report will include:\n\
         - Total policy count\n\
         - Distribution by category\n\
         - Distribution by sport\n\
         - Recent updates\n\
         - Key policies by category\n\
         - Compliance status overview\n\n\
         Would you like me to:\n\
         1. Generate a detailed PDF report\n\
         2. Show a quick summary here\n\
         3. Export as a CSV for further analysis\n\n\
         Which format would you prefer?"
    )
}

fn compliance_check_text(state: &ServerState, sport: &str) -> Result<String, McpError> {
    let sport_name = match find_sport_by_abbreviation(state.store(), sport) {
        Ok(found) => found.name,
        Err(DoxError::NotFound { .. }) => sport.to_string(),
        Err(e) => return Err(e.into()),
    };

    let mut text = format!(
        "Running compliance check for {sport_name}...\n\n\
         I'll verify:\n\
         1. **Required Policies** - Checking all mandatory policy categories are covered\n\
         2. **Policy Status** - Ensuring all policies are current (not draft/archived)\n\
         3. **Expiration Dates** - Identifying policies nearing expiration\n\
         4. **Version Control** - Checking for outdated policy versions\n\
         5. **Coverage Gaps** - Identifying missing policy areas\n\n\
         Standard required categories for all sports:\n"
    );
    for category in REQUIRED_CATEGORIES {
        let _ = writeln!(text, "- {}", category.label());
    }
    text.push_str("\nWould you like me to generate a detailed compliance report?");
    Ok(text)
}

mod common;

use common::{names, TestProject};

fn project_with(agents: &[&str]) -> TestProject {
    let project = TestProject::new("Acme");
    for agent in agents {
        project.ok(&["add", "agent", "--name", agent]);
    }
    project
}

#[test]
fn test_attach_agent_creates_invocation_tool() {
    let project = project_with(&["A", "B"]);
    let result = project.ok(&["attach", "agent", "--source", "A", "--target", "B"]);
    assert_eq!(result["resourceType"], "agent");

    let tool = &project.agent("A")["remoteTools"][0];
    assert_eq!(tool["name"], "invokeB");
    assert_eq!(tool["targetAgent"], "B");
}

#[test]
fn test_attach_agent_to_itself_fails() {
    let project = project_with(&["A", "B", "C"]);
    let before = project.read("agentcore.json");

    let result = project.json(&["attach", "agent", "--source", "A", "--target", "A"]);
    assert_eq!(result["success"], false);
    assert!(result["error"]
        .as_str()
        .unwrap()
        .contains("cannot be attached to itself"));
    assert_eq!(project.read("agentcore.json"), before);
}

#[test]
fn test_attach_twice_reports_already_attached() {
    let project = project_with(&["A", "B"]);
    project.ok(&["add", "memory", "--name", "Notes", "--owner", "A"]);
    project.ok(&["attach", "memory", "--agent", "B", "--memory", "Notes", "--access", "read"]);

    let result = project.json(&["attach", "memory", "--agent", "B", "--memory", "Notes"]);
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().contains("already attached"));

    let b = project.agent("B");
    assert_eq!(names(&b["memoryProviders"], "name"), vec!["Notes"]);
    assert_eq!(b["memoryProviders"][0]["relation"], "use");
    assert_eq!(b["memoryProviders"][0]["access"], "read");
}

#[test]
fn test_attach_identity_by_simple_or_qualified_name() {
    let project = project_with(&["Owner", "User", "Other"]);
    project.ok(&["add", "identity", "--name", "Key", "--owner", "Owner"]);

    let by_qualified = project.ok(&["attach", "identity", "--agent", "User", "--identity", "AcmeKey"]);
    let by_simple = project.ok(&["attach", "identity", "--agent", "Other", "--identity", "Key"]);
    assert_eq!(by_qualified["resourceName"], "AcmeKey");
    assert_eq!(by_simple["resourceName"], "AcmeKey");

    let owner_env = project.agent("Owner")["identityProviders"][0]["envVarName"].clone();
    for agent in ["User", "Other"] {
        let provider = &project.agent(agent)["identityProviders"][0];
        assert_eq!(provider["name"], "AcmeKey");
        assert_eq!(provider["relation"], "use");
        assert_eq!(provider["envVarName"], owner_env);
    }
}

#[test]
fn test_attach_missing_gateway_fails() {
    let project = project_with(&["A"]);
    let result = project.json(&["attach", "gateway", "--agent", "A", "--gateway", "nope"]);
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "Gateway 'nope' not found");
}

#[test]
fn test_attach_mcp_runtime_binds_agent() {
    let project = project_with(&["A"]);
    project.ok(&[
        "add",
        "mcp-tool",
        "--name",
        "search",
        "--host",
        "agentcore-runtime",
    ]);
    project.ok(&["attach", "mcp-runtime", "--agent", "A", "--tool", "search"]);

    let tool = &project.doc("mcp.json")["mcpRuntimeTools"][0];
    assert_eq!(tool["name"], "search");
    assert_eq!(names(&tool["bindings"], "agentName"), vec!["A"]);
}

use std::io::Write as _;

use serde_json::json;

use agentweave::{
    load_workflow_from_path, AgentConfig, Orchestrator, RunStatus, Workflow, WorkflowType,
};

fn configs() -> Vec<AgentConfig> {
    vec![
        AgentConfig::new("researcher")
            .with_name("Researcher")
            .with_role("research"),
        AgentConfig::new("fact_checker").with_role("research"),
        AgentConfig::new("writer").with_role("write"),
    ]
}

#[tokio::test]
async fn load_agents_registers_and_supports_role_lookup() -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new();
    orchestrator.load_agents(configs()).await?;

    assert_eq!(orchestrator.all_agents().len(), 3);
    assert_eq!(orchestrator.agents_by_role("research").len(), 2);
    assert_eq!(orchestrator.agents_by_role("write").len(), 1);
    assert!(orchestrator.agents_by_role("nothing").is_empty());

    let researcher = orchestrator.agent("researcher").unwrap();
    assert_eq!(researcher.name(), "Researcher");
    Ok(())
}

#[tokio::test]
async fn loading_same_id_overwrites_previous_registration() -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new();
    orchestrator
        .load_agent(AgentConfig::new("a").with_role("first"))
        .await?;
    orchestrator
        .load_agent(AgentConfig::new("a").with_role("second"))
        .await?;

    assert_eq!(orchestrator.all_agents().len(), 1);
    assert_eq!(orchestrator.agent("a").unwrap().role(), "second");
    Ok(())
}

#[tokio::test]
async fn clear_empties_agents_and_workflows() -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new();
    orchestrator.load_agents(configs()).await?;
    orchestrator.register_workflow(Workflow::new("w1", WorkflowType::Sequential));

    orchestrator.clear();

    assert!(orchestrator.all_agents().is_empty());
    assert!(orchestrator.workflow("w1").is_none());
    Ok(())
}

#[tokio::test]
async fn execute_by_id_with_unregistered_workflow_degrades_to_error() {
    let orchestrator = Orchestrator::new();
    let result = orchestrator.execute_workflow_by_id("ghost", json!("in")).await;

    assert_eq!(result.status, RunStatus::Error);
    assert_eq!(result.workflow_id, "ghost");
    assert!(result.error.as_deref().unwrap().contains("not registered"));
}

#[tokio::test]
async fn registered_workflow_runs_with_loaded_agents() -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new();
    orchestrator.load_agents(configs()).await?;

    let workflow: Workflow = serde_json::from_value(json!({
        "id": "publish",
        "workflowType": "sequential",
        "agentsConfig": [{"agentId": "researcher"}, {"agentId": "writer"}],
    }))?;
    orchestrator.register_workflow(workflow);

    let result = orchestrator
        .execute_workflow_by_id("publish", json!("quantum computing"))
        .await;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.agent_results.len(), 2);
    // 配置驱动的 Agent 回显结构化载荷
    assert_eq!(result.agent_results[0].output["agent"], "researcher");
    assert_eq!(result.agent_results[0].output["input"], "quantum computing");
    // 第二个 Agent 的提示词上下文里能看到第一个的输出
    assert!(result.agent_results[1].output["promptContext"]
        .as_str()
        .unwrap()
        .contains("Previous agent outputs:"));
    Ok(())
}

#[tokio::test]
async fn workflow_definition_loads_from_disk() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{
            "id": "from-disk",
            "workflowType": "parallel",
            "agentsConfig": [{{"id": "researcher"}}, {{"id": "fact_checker"}}]
        }}"#
    )?;

    let workflow = load_workflow_from_path(file.path())?;
    assert_eq!(workflow.workflow_type, WorkflowType::Parallel);

    let orchestrator = Orchestrator::new();
    orchestrator.load_agents(configs()).await?;
    let result = orchestrator.execute_workflow(&workflow, json!("check this")).await;

    assert_eq!(result.status, RunStatus::Completed);
    assert_eq!(result.agent_results.len(), 2);
    Ok(())
}

use reddit_tool::*;
use reddit_types::*;

fn echo_definition(name: &str) -> ToolDefinition {
    ToolDefinition {
        name: name.into(),
        description: "echo".into(),
        args: vec![ArgSpec::string("text", "")],
        result: ResultKind::CreatedComment,
        mutating: false,
    }
}

#[test]
fn register_and_lookup() {
    let mut registry = ToolRegistry::new();
    registry.register(echo_definition("echo")).unwrap();
    let def = registry.lookup("echo").unwrap();
    assert_eq!(def.name, "echo");
    assert_eq!(registry.len(), 1);
}

#[test]
fn duplicate_registration_fails() {
    let mut registry = ToolRegistry::new();
    registry.register(echo_definition("echo")).unwrap();
    let err = registry.register(echo_definition("echo")).unwrap_err();
    assert_eq!(err, RegistryError::Duplicate("echo".into()));
    assert_eq!(registry.len(), 1);
}

#[test]
fn lookup_unknown_tool() {
    let registry = ToolRegistry::new();
    let err = registry.lookup("nonexistent").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownTool);
    assert!(registry.get("nonexistent").is_none());
}

#[test]
fn definitions_keep_registration_order() {
    let mut registry = ToolRegistry::new();
    registry.register(echo_definition("b")).unwrap();
    registry.register(echo_definition("a")).unwrap();
    let names: Vec<_> = registry.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["b", "a"]);
}

#[test]
fn reddit_registry_has_the_six_tools() {
    let registry = ToolRegistry::reddit();
    let names: Vec<_> = registry.definitions().iter().map(|d| d.name.clone()).collect();
    assert_eq!(
        names,
        [FETCH_POSTS, SEARCH_POSTS, GET_COMMENTS, SUBREDDIT_INFO, POST_COMMENT, CREATE_POST]
    );
}

#[test]
fn every_reddit_tool_has_a_schema() {
    let registry = ToolRegistry::reddit();
    for def in registry.iter() {
        let looked_up = registry.lookup(&def.name).unwrap();
        assert!(!looked_up.args.is_empty(), "{} has no arguments", def.name);
        let schema = looked_up.input_schema();
        assert_eq!(schema["type"], "object", "{}", def.name);
        assert!(schema["properties"].as_object().is_some_and(|p| !p.is_empty()));
    }
}

#[test]
fn only_write_tools_are_mutating() {
    let registry = ToolRegistry::reddit();
    let mutating: Vec<_> = registry
        .iter()
        .filter(|d| d.mutating)
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(mutating, [POST_COMMENT, CREATE_POST]);
}

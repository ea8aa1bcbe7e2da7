use notegraph_core::db::open_db_in_memory;
use notegraph_core::{
    CloudService, ConnectionService, GraphService, LinkService, NoteDraft, NoteService,
    SqliteGraphRepository,
};
use serde_json::Value;

#[test]
fn export_contains_every_stored_entity_exactly_once() {
    let mut conn = open_db_in_memory().unwrap();

    let home = NoteService::new(&mut conn)
        .create_note(&NoteDraft::new("Home"))
        .unwrap();
    LinkService::new(&mut conn)
        .reconcile(home.id, "Link to [[Away]]")
        .unwrap();
    CloudService::new(&mut conn).create_cloud("Ideas").unwrap();

    let repo = SqliteGraphRepository::new(&conn);
    let export = GraphService::new(repo).export_graph().unwrap();

    assert_eq!(export.nodes.len(), 2);
    assert_eq!(export.links.len(), 1);
    assert_eq!(export.clouds.len(), 1);

    let away = export
        .nodes
        .iter()
        .find(|node| node.title == "Away")
        .expect("stub should be exported");
    assert_eq!(export.links[0].source_id, home.id);
    assert_eq!(export.links[0].target_id, away.id);
}

#[test]
fn export_serializes_to_the_client_facing_shape() {
    let mut conn = open_db_in_memory().unwrap();

    let home = NoteService::new(&mut conn)
        .create_note(&NoteDraft::new("Home"))
        .unwrap();
    LinkService::new(&mut conn)
        .reconcile(home.id, "Link to [[Away]]")
        .unwrap();
    CloudService::new(&mut conn).create_cloud("Ideas").unwrap();

    let repo = SqliteGraphRepository::new(&conn);
    let export = GraphService::new(repo).export_graph().unwrap();
    let json = serde_json::to_value(&export).unwrap();

    let nodes = json["nodes"].as_array().unwrap();
    let home_node = nodes
        .iter()
        .find(|node| node["title"] == "Home")
        .expect("node keyed by `title`");
    assert_eq!(home_node["id"], Value::from(home.id));
    assert_eq!(home_node["color"], "#44aaff");
    assert_eq!(home_node["cloud_id"], Value::Null);
    assert!(home_node["x"].is_number());
    assert!(home_node["z"].is_number());

    let link = &json["links"].as_array().unwrap()[0];
    assert_eq!(link["source"], Value::from(home.id));
    assert!(link["target"].is_i64());
    assert_eq!(link["type"], "derived");

    let cloud = &json["clouds"].as_array().unwrap()[0];
    assert_eq!(cloud["name"], "Ideas");
}

#[test]
fn manual_links_serialize_with_manual_type_tag() {
    let mut conn = open_db_in_memory().unwrap();

    let a = NoteService::new(&mut conn)
        .create_note(&NoteDraft::new("a"))
        .unwrap();
    let b = NoteService::new(&mut conn)
        .create_note(&NoteDraft::new("b"))
        .unwrap();
    ConnectionService::new(&mut conn)
        .create_manual_connection(a.id, b.id)
        .unwrap();

    let repo = SqliteGraphRepository::new(&conn);
    let export = GraphService::new(repo).export_graph().unwrap();
    let json = serde_json::to_value(&export).unwrap();

    assert_eq!(json["links"][0]["type"], "manual");
}

#[test]
fn export_of_empty_store_is_empty_but_well_formed() {
    let conn = open_db_in_memory().unwrap();

    let repo = SqliteGraphRepository::new(&conn);
    let export = GraphService::new(repo).export_graph().unwrap();

    assert!(export.nodes.is_empty());
    assert!(export.links.is_empty());
    assert!(export.clouds.is_empty());
}

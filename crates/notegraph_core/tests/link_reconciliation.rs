use notegraph_core::db::open_db_in_memory;
use notegraph_core::{
    Connection, ConnectionKind, ConnectionService, GraphRepository, LinkService, LinkServiceError,
    Note, NoteDraft, NoteId, NoteService, SqliteGraphRepository,
};

#[test]
fn reconcile_links_content_reference_to_existing_note() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");
    let target = create_note(&mut conn, "A");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "points at [[A]]")
        .unwrap();

    assert_eq!(outcome.note.content, "points at [[A]]");
    assert_eq!(outcome.derived.len(), 1);
    assert_eq!(outcome.derived[0].source_id, source.id);
    assert_eq!(outcome.derived[0].target_id, target.id);
    assert_eq!(outcome.derived[0].kind, ConnectionKind::Derived);
    assert_eq!(derived_from(&conn, source.id), endpoints(&outcome.derived));
}

#[test]
fn reconcile_with_empty_content_clears_derived_links() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");
    create_note(&mut conn, "A");

    LinkService::new(&mut conn)
        .reconcile(source.id, "[[A]]")
        .unwrap();
    assert_eq!(derived_from(&conn, source.id).len(), 1);

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "")
        .unwrap();
    assert!(outcome.derived.is_empty());
    assert!(derived_from(&conn, source.id).is_empty());
}

#[test]
fn reconcile_twice_with_identical_content_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");
    create_note(&mut conn, "A");
    create_note(&mut conn, "B");

    let content = "[[A]] then [[B]] then [[A]]";
    let first = LinkService::new(&mut conn)
        .reconcile(source.id, content)
        .unwrap();
    let second = LinkService::new(&mut conn)
        .reconcile(source.id, content)
        .unwrap();

    assert_eq!(endpoints(&first.derived), endpoints(&second.derived));
    assert_eq!(
        derived_from(&conn, source.id),
        endpoints(&second.derived),
        "no stale rows may survive the rebuild"
    );
}

#[test]
fn reconcile_creates_stub_note_for_unresolved_reference() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "see [[Ghost]]")
        .unwrap();

    let stub = find_by_title(&conn, "Ghost").expect("stub note should exist");
    assert_eq!(stub.content, "");
    assert_eq!(stub.cloud_id, None);
    assert_eq!(outcome.derived.len(), 1);
    assert_eq!(outcome.derived[0].target_id, stub.id);
}

#[test]
fn repeated_unresolved_reference_creates_one_stub_with_two_links() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "see [[Ghost]] and again [[Ghost]]")
        .unwrap();

    let repo = SqliteGraphRepository::new(&conn);
    let ghosts: Vec<Note> = repo
        .list_notes()
        .unwrap()
        .into_iter()
        .filter(|note| note.title == "Ghost")
        .collect();
    assert_eq!(ghosts.len(), 1, "a second stub must not be created");

    assert_eq!(outcome.derived.len(), 2);
    assert!(outcome
        .derived
        .iter()
        .all(|link| link.target_id == ghosts[0].id));
}

#[test]
fn repeated_reference_to_existing_note_creates_one_link_per_occurrence() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");
    let target = create_note(&mut conn, "A");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "[[A]] and [[A]]")
        .unwrap();

    assert_eq!(outcome.derived.len(), 2);
    assert!(outcome
        .derived
        .iter()
        .all(|link| link.target_id == target.id));
}

#[test]
fn self_reference_produces_no_connection() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Self");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "[[Self]]")
        .unwrap();

    assert!(outcome.derived.is_empty());
    assert!(derived_from(&conn, source.id).is_empty());
}

#[test]
fn empty_reference_resolves_to_empty_titled_stub() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");

    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "odd but accepted: [[]]")
        .unwrap();

    let stub = find_by_title(&conn, "").expect("empty-titled stub should exist");
    assert_eq!(outcome.derived.len(), 1);
    assert_eq!(outcome.derived[0].target_id, stub.id);
}

#[test]
fn manual_connections_survive_reconciliation() {
    let mut conn = open_db_in_memory().unwrap();
    let source = create_note(&mut conn, "Source");
    let neighbor = create_note(&mut conn, "Neighbor");
    create_note(&mut conn, "A");

    let manual = ConnectionService::new(&mut conn)
        .create_manual_connection(source.id, neighbor.id)
        .unwrap();

    // Prior derived links from the source get replaced, the manual one
    // stays.
    LinkService::new(&mut conn)
        .reconcile(source.id, "[[A]]")
        .unwrap();
    let outcome = LinkService::new(&mut conn)
        .reconcile(source.id, "no references anymore")
        .unwrap();
    assert!(outcome.derived.is_empty());

    let repo = SqliteGraphRepository::new(&conn);
    let remaining: Vec<Connection> = repo
        .list_connections()
        .unwrap()
        .into_iter()
        .filter(|link| link.source_id == source.id)
        .collect();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, manual.id);
    assert_eq!(remaining[0].kind, ConnectionKind::Manual);
}

#[test]
fn reconcile_unknown_note_fails_and_leaves_store_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    let bystander = create_note(&mut conn, "A");

    let err = LinkService::new(&mut conn)
        .reconcile(9999, "[[A]] and [[Ghost]]")
        .unwrap_err();
    assert!(matches!(err, LinkServiceError::NoteNotFound(9999)));

    let repo = SqliteGraphRepository::new(&conn);
    assert!(repo.list_connections().unwrap().is_empty());
    let notes = repo.list_notes().unwrap();
    assert_eq!(notes.len(), 1, "no stub may be created by a failed pass");
    assert_eq!(notes[0].id, bystander.id);
}

fn create_note(conn: &mut rusqlite::Connection, title: &str) -> Note {
    NoteService::new(conn)
        .create_note(&NoteDraft::new(title))
        .unwrap()
}

fn derived_from(conn: &rusqlite::Connection, source_id: NoteId) -> Vec<(NoteId, NoteId)> {
    let links: Vec<Connection> = SqliteGraphRepository::new(conn)
        .list_connections()
        .unwrap()
        .into_iter()
        .filter(|link| link.source_id == source_id && link.kind == ConnectionKind::Derived)
        .collect();
    endpoints(&links)
}

fn endpoints(links: &[Connection]) -> Vec<(NoteId, NoteId)> {
    links
        .iter()
        .map(|link| (link.source_id, link.target_id))
        .collect()
}

fn find_by_title(conn: &rusqlite::Connection, title: &str) -> Option<Note> {
    SqliteGraphRepository::new(conn)
        .find_note_by_title(title)
        .unwrap()
}

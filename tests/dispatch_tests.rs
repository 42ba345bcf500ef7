//! End-to-end tests of command handling: raw text in, reply lines out.

use taskbot::command::Request;
use taskbot::config::RepliesConfig;
use taskbot::db::Database;
use taskbot::dispatch::Dispatcher;

fn setup() -> (Database, Dispatcher) {
    let db = Database::open_in_memory().expect("Failed to create in-memory database");
    let dispatcher = Dispatcher::new(db.clone(), RepliesConfig::default());
    (db, dispatcher)
}

#[test]
fn new_item_then_all_shows_empty_description() {
    let (_db, d) = setup();

    assert_eq!(d.dispatch(7, "/new_item Water the plants"), vec!["Task added"]);
    assert_eq!(d.dispatch(7, "/all"), vec!["Water the plants,empty"]);
}

#[test]
fn all_never_shows_other_senders_tasks() {
    let (_db, d) = setup();

    d.dispatch(1, "/new_item alpha");
    d.dispatch(2, "/new_item beta");

    assert_eq!(d.dispatch(1, "/all"), vec!["alpha,empty"]);
    assert_eq!(d.dispatch(2, "/all"), vec!["beta,empty"]);
    assert!(d.dispatch(3, "/all").is_empty());
}

#[test]
fn delete_of_missing_id_replies_like_existing() {
    let (db, d) = setup();
    d.dispatch(1, "/new_item keep me");

    let missing = d.dispatch(1, "/delete 7");
    assert_eq!(db.delete_task(7).unwrap(), 0);
    assert_eq!(db.list_tasks(1).unwrap().len(), 1);

    let existing = d.dispatch(1, "/delete 1");
    assert_eq!(missing, existing);
    assert_eq!(existing, vec!["Task deleted"]);
    assert!(db.list_tasks(1).unwrap().is_empty());
}

#[test]
fn add_replaces_empty_description() {
    let (_db, d) = setup();
    d.dispatch(5, "/new_item groceries");

    assert_eq!(d.dispatch(5, "/add groceries 2percent"), vec!["Description added"]);
    assert_eq!(d.dispatch(5, "/all"), vec!["groceries,2percent"]);
}

#[test]
fn add_for_unknown_name_still_confirms() {
    let (_db, d) = setup();

    assert_eq!(d.dispatch(5, "/add nothing here"), vec!["Description added"]);
}

#[test]
fn buy_milk_walkthrough() {
    let (db, d) = setup();

    assert_eq!(d.dispatch(42, "/new_item Buy milk"), vec!["Task added"]);
    let task = db.get_task(1).unwrap().expect("row 1 exists");
    assert_eq!(task.name, "Buy milk");
    assert_eq!(task.owner_id, 42);
    assert_eq!(task.description, "empty");

    assert_eq!(d.dispatch(42, "/all"), vec!["Buy milk,empty"]);

    // The two-token /add grammar reads this as name "Buy", description "milk"
    assert_eq!(d.dispatch(42, "/add Buy milk 2percent"), vec!["Description added"]);
    assert_eq!(d.dispatch(42, "/all"), vec!["Buy milk,empty"]);

    // A multi-word name can only be addressed through a parsed request
    let replies = d
        .execute(&Request::SetDescription {
            name: "Buy milk".to_string(),
            description: "2percent".to_string(),
        })
        .unwrap();
    assert_eq!(replies, vec!["Description added"]);
    assert_eq!(d.dispatch(42, "/all"), vec!["Buy milk,2percent"]);

    assert_eq!(d.dispatch(42, "/delete 1"), vec!["Task deleted"]);
    assert!(db.get_task(1).unwrap().is_none());
    assert!(d.dispatch(42, "/all").is_empty());
}

#[test]
fn errors_become_single_reply_lines() {
    let (_db, d) = setup();

    let cases = [
        ("/delete", "Invalid arguments: "),
        ("/delete one", "Invalid arguments: "),
        ("/add lonely", "Invalid arguments: "),
        ("/new_item", "Invalid arguments: "),
        ("/unknown", "Unknown command: /unknown"),
        ("just chatting", "Unknown command: just chatting"),
    ];
    for (text, prefix) in cases {
        let replies = d.dispatch(1, text);
        assert_eq!(replies.len(), 1, "{}", text);
        assert!(replies[0].starts_with(prefix), "{} -> {:?}", text, replies);
    }
}

#[test]
fn custom_reply_texts_are_used() {
    let db = Database::open_in_memory().unwrap();
    let replies = RepliesConfig {
        greeting: "Привет, пользователь!".to_string(),
        task_created: "Задание добавлено".to_string(),
        ..RepliesConfig::default()
    };
    let d = Dispatcher::new(db, replies);

    assert_eq!(d.dispatch(1, "/start"), vec!["Привет, пользователь!"]);
    assert_eq!(d.dispatch(1, "/new_item x"), vec!["Задание добавлено"]);
}

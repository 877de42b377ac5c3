use prepgantt_core::{
    keys, open_db_in_memory, AccountError, AccountService, BlobStore, Board, Category,
    SqliteBlobStore, UnitKind,
};
use std::sync::atomic::{AtomicI64, Ordering};

static CLOCK: AtomicI64 = AtomicI64::new(1_000);

fn ticking_clock() -> i64 {
    CLOCK.fetch_add(1_000, Ordering::SeqCst)
}

#[test]
fn authenticate_is_stable_per_identifier() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteBlobStore::try_new(&conn).unwrap());

    let first = service.authenticate("Ada@Example.com").unwrap();
    let second = service.authenticate(" ada@example.com ").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.identifier, "ada@example.com");
    assert_eq!(service.current_user().unwrap(), Some(first));
}

#[test]
fn authenticate_rejects_non_email_identifier() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteBlobStore::try_new(&conn).unwrap());

    assert!(matches!(
        service.authenticate("not-an-email"),
        Err(AccountError::InvalidIdentifier(_))
    ));
    assert_eq!(service.current_user().unwrap(), None);
}

#[test]
fn sign_out_forgets_user_and_active_plan() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteBlobStore::try_new(&conn).unwrap());
    let user = service.authenticate("ada@example.com").unwrap();
    let plan = service
        .create_plan(&user, "Week one", Board::with_defaults().units().to_vec())
        .unwrap();
    service.set_active_plan(Some(plan.id)).unwrap();

    service.sign_out().unwrap();

    assert!(matches!(service.require_user(), Err(AccountError::NotSignedIn)));
    assert_eq!(service.active_plan_id().unwrap(), None);
    assert_eq!(service.list_plans(user.id).unwrap().len(), 1);
}

#[test]
fn plans_are_listed_per_owner_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let service =
        AccountService::with_clock(SqliteBlobStore::try_new(&conn).unwrap(), ticking_clock);
    let ada = service.authenticate("ada@example.com").unwrap();
    let bob = service.authenticate("bob@example.com").unwrap();

    let older = service.create_plan(&ada, "Older", Vec::new()).unwrap();
    service.create_plan(&bob, "Bob plan", Vec::new()).unwrap();
    let newer = service.create_plan(&ada, "Newer", Vec::new()).unwrap();

    let names: Vec<String> = service
        .list_plans(ada.id)
        .unwrap()
        .into_iter()
        .map(|plan| plan.name)
        .collect();
    assert_eq!(names, vec!["Newer", "Older"]);
    assert!(newer.last_saved_at > older.last_saved_at);
    assert_eq!(service.list_plans(bob.id).unwrap().len(), 1);
}

#[test]
fn save_plan_overwrites_by_id() {
    let conn = open_db_in_memory().unwrap();
    let service =
        AccountService::with_clock(SqliteBlobStore::try_new(&conn).unwrap(), ticking_clock);
    let user = service.authenticate("ada@example.com").unwrap();
    let mut board = Board::new();
    board.add(Category::Behave, UnitKind::AiMock);
    let mut plan = service
        .create_plan(&user, "Draft", board.units().to_vec())
        .unwrap();

    board.add(Category::Behave, UnitKind::RealMock);
    plan.units = board.units().to_vec();
    plan.name = "  Final  ".to_string();
    let saved = service.save_plan(plan.clone()).unwrap();

    let plans = service.list_plans(user.id).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].id, plan.id);
    assert_eq!(plans[0].name, "Final");
    assert_eq!(plans[0].units.len(), 2);
    assert!(saved.last_saved_at > 0);
    assert_eq!(service.get_plan(plan.id).unwrap(), Some(saved));
}

#[test]
fn blank_plan_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteBlobStore::try_new(&conn).unwrap());
    let user = service.authenticate("ada@example.com").unwrap();

    assert!(matches!(
        service.create_plan(&user, "   ", Vec::new()),
        Err(AccountError::InvalidPlanName)
    ));
    assert!(service.list_plans(user.id).unwrap().is_empty());
}

#[test]
fn delete_plan_clears_matching_active_marker() {
    let conn = open_db_in_memory().unwrap();
    let service = AccountService::new(SqliteBlobStore::try_new(&conn).unwrap());
    let user = service.authenticate("ada@example.com").unwrap();
    let keep = service.create_plan(&user, "Keep", Vec::new()).unwrap();
    let dropped = service.create_plan(&user, "Drop", Vec::new()).unwrap();
    service.set_active_plan(Some(dropped.id)).unwrap();

    service.delete_plan(dropped.id).unwrap();

    assert_eq!(service.active_plan_id().unwrap(), None);
    let remaining: Vec<_> = service
        .list_plans(user.id)
        .unwrap()
        .into_iter()
        .map(|plan| plan.id)
        .collect();
    assert_eq!(remaining, vec![keep.id]);
    assert!(matches!(
        service.delete_plan(dropped.id),
        Err(AccountError::PlanNotFound(id)) if id == dropped.id
    ));
}

#[test]
fn corrupt_plan_store_reads_as_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBlobStore::try_new(&conn).unwrap();
    store.save(keys::PLANS, "[{\"broken\"").unwrap();
    let service = AccountService::new(store);
    let user = service.authenticate("ada@example.com").unwrap();

    assert!(service.list_plans(user.id).unwrap().is_empty());
    service.create_plan(&user, "Fresh", Vec::new()).unwrap();
    assert_eq!(service.list_plans(user.id).unwrap().len(), 1);
}

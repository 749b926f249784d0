//! Given steps for task API BDD scenarios.

use super::world::TaskApiWorld;
use rstest_bdd_macros::given;
use serde_json::json;

#[given("an empty task store")]
fn empty_task_store(world: &mut TaskApiWorld) {
    world.task_id = None;
    world.last_response = None;
}

#[given(r#"a stored task titled "{title}""#)]
fn stored_task(world: &mut TaskApiWorld, title: String) -> Result<(), eyre::Report> {
    world.create(&json!({ "title": title }))?;
    if world.task_id.is_none() {
        return Err(eyre::eyre!("seeding task {title:?} failed"));
    }
    Ok(())
}

#[given("{count} stored tasks")]
fn stored_tasks(world: &mut TaskApiWorld, count: usize) -> Result<(), eyre::Report> {
    for index in 0..count {
        world.create(&json!({ "title": format!("Seeded task {index}") }))?;
    }
    Ok(())
}

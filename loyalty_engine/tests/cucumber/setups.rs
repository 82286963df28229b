use cucumber::given;
use loyalty_engine::AuthManagement;

use crate::cucumber::{loyalty_world::LoyaltySystem, LoyaltyWorld};

#[given("a fresh install")]
async fn fresh_database(world: &mut LoyaltyWorld) {
    let system = LoyaltySystem::new().await;
    world.system = Some(system);
}

#[given(expr = "a user named {word}")]
async fn create_user(world: &mut LoyaltyWorld, login: String) {
    let system = world.system();
    let user = system.db.create_user(&login, "$argon2id$cucumber").await.expect("Error creating user");
    system.users.insert(login, user.id);
}

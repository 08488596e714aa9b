//! BDD scenarios for agent handoff context preservation.

mod world;
mod given;
mod when;
mod then;

use rstest_bdd_macros::scenario;
use world::{HandoffWorld, world as _};

#[scenario(
    path = "tests/features/agent_handoff.feature",
    name = "Successful handoff to a different agent"
)]
#[tokio::test(flavor = "multi_thread")]
async fn successful_handoff(world: HandoffWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_handoff.feature",
    name = "Complete handoff when target agent accepts"
)]
#[tokio::test(flavor = "multi_thread")]
async fn complete_handoff_scenario(world: HandoffWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_handoff.feature",
    name = "Cancel a pending handoff"
)]
#[tokio::test(flavor = "multi_thread")]
async fn cancel_handoff_scenario(world: HandoffWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_handoff.feature",
    name = "Handoff references prior turn and tool calls"
)]
#[tokio::test(flavor = "multi_thread")]
async fn handoff_with_references(world: HandoffWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/agent_handoff.feature",
    name = "Multiple handoffs in a conversation chain"
)]
#[tokio::test(flavor = "multi_thread")]
async fn multiple_handoffs(world: HandoffWorld) {
    let _ = world;
}

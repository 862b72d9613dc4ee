//! Component schema of the scene.
//!
//! | name      | shape   | payload       |
//! |-----------|---------|---------------|
//! | `Mesh`    | payload | `MeshHandle`  |
//! | `Physics` | payload | `BodyHandle`  |
//! | `Input`   | payload | `InputFlags`  |
//! | `Player`  | tag     | -             |

use tickscene_common::{BodyHandle, MeshHandle};
use tickscene_ecs::{EcsError, World};
use tickscene_input::InputFlags;

pub const MESH: &str = "Mesh";
pub const PHYSICS: &str = "Physics";
pub const INPUT: &str = "Input";
pub const PLAYER: &str = "Player";

/// Register every component store the systems expect.
pub fn register_all(world: &mut World) -> Result<(), EcsError> {
    world.register_component::<MeshHandle>(MESH)?;
    world.register_component::<BodyHandle>(PHYSICS)?;
    world.register_component::<InputFlags>(INPUT)?;
    world.register_tag(PLAYER)?;
    Ok(())
}

//! Depot helpers for carrying the actor from middleware to handlers.

use super::ActorContext;

pub mod depot_keys {
    pub const ACTOR: &str = "__actor";
}

/// Get the actor the authentication middleware stored in the depot.
///
/// A depot without an actor yields [`ActorContext::Anonymous`].
#[must_use]
pub fn get_actor_from_depot(depot: &salvo::Depot) -> ActorContext {
    depot
        .get::<ActorContext>(depot_keys::ACTOR)
        .cloned()
        .unwrap_or(ActorContext::Anonymous)
}

/// Check if the request is from an authenticated actor.
#[must_use]
pub fn is_authenticated(depot: &salvo::Depot) -> bool {
    depot
        .get::<ActorContext>(depot_keys::ACTOR)
        .is_ok_and(|ctx| matches!(ctx, ActorContext::Authenticated(_)))
}

/// Greedy battery charge and discharge scheduling.
pub mod dispatch;
pub mod homeowner;
/// Hot, mild and winter archetype blending.
pub mod yearly;

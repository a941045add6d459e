//! Scenario tests spanning the world, transforms and collision

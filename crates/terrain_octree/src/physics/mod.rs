//! Physics module for collision detection against static terrain
//!
//! The broad phase is the terrain octree; this module interprets its leaf
//! results as contacts, altitudes and picks.

pub mod collision;

pub use collision::{
    altitude,
    ground_contact,
    pick,
    GroundContact,
    PickHit,
    Ray,
    Triangle,
};

//! MirrorStep Feedback
//!
//! Turns a comparison result into things a performer can act on:
//! short correction messages and a color per skeleton bone.
//!
//! Both stages take the comparison result as an argument; neither keeps
//! state between steps.

pub mod feedback;
pub mod skeleton;

pub use feedback::*;
pub use skeleton::*;

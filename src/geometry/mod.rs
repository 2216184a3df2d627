//! Geometric primitives for the maze
//!
//! Zones (open axis-aligned rectangles), the waypoint lattice that gives
//! roadmap nodes an exact identity, discrete headings, and the static layout
//! of a maze (walls, target, danger band, origin).

pub mod lattice;
pub mod maze;
pub mod zone;

pub use lattice::{Cell, Heading, Lattice, Waypoint};
pub use maze::MazeLayout;
pub use zone::Zone;

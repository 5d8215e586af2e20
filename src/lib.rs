//! Plexus Studio RS
//! 3D plexus particle field with perspective projection and depth of field

pub mod blur;
pub mod config;
pub mod connections;
pub mod effect;
pub mod particles;
pub mod projection;
pub mod renderer;
pub mod shading;
pub mod surface;

pub use config::{ColorPalette, ParamKind, ParamSpec, PlexusConfig, PARAM_SCHEMA};
pub use effect::PlexusEffect;
pub use surface::{FrameSurface, PainterSurface, Surface};

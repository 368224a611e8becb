//! exgrid_engine - Grid primitives shared by the exgrid document model.

pub mod engine;

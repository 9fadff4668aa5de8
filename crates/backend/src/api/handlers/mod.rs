pub mod items;
pub mod metas;

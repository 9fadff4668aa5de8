pub mod metas;

mod tab;

pub use tab::TabId;

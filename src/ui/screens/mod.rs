pub(crate) mod budget;
pub(crate) mod charts;
pub(crate) mod dashboard;
pub(crate) mod transactions;

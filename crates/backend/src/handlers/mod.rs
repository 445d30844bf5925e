pub mod a001_offer;
pub mod usecases;

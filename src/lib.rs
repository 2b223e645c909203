#[allow(non_snake_case)]
pub mod ConservationLaws;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Utils;

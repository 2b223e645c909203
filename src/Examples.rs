/// worked reaction networks for the conserved moieties analysis
pub mod moiety_examples;

/// eng
/// Loading of stoichiometric matrices and species names from text files
/// (numbers separated by whitespace, commas or semicolons, one name per line).
pub mod load_from_file;

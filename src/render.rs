//! Graphviz rendering of network structures.

use crate::structure::Structure;
use crate::util::Result;

use std::fs;
use std::path::Path;

/// Render a structure in Graphviz DOT form, nodes first and then the edges, both in
/// structure order.
pub fn to_dot(structure: &Structure) -> String {
    let mut out = String::from("digraph structure {\n");

    for node in structure.nodes() {
        out.push_str(&format!("    \"{}\";\n", node));
    }
    for (parent, child) in structure.edges() {
        out.push_str(&format!("    \"{}\" -> \"{}\";\n", parent, child));
    }

    out.push_str("}\n");
    out
}

/// Write the DOT rendering of a structure to a file.
pub fn save_dot<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<()> {
    fs::write(path.as_ref(), to_dot(structure))?;
    Ok(())
}

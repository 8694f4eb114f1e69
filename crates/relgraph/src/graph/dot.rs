//! GraphViz DOT dump for debugging.
//!
//! Vertices are numbered `v0, v1, ...` in the order the dump first mentions them and labelled
//! with their `Display` form. Adjacency lines come first, then one bare line per vertex that
//! no adjacency line mentions, then the labels in numbering order.

use super::Graph;
use super::store::VertexId;
use std::fmt;

impl<V: fmt::Display, C> Graph<V, C> {
    pub fn dot(&self) -> Dot<'_, V, C> {
        Dot { graph: self }
    }

    pub fn to_dot(&self) -> String {
        self.dot().to_string()
    }
}

pub struct Dot<'g, V, C> {
    graph: &'g Graph<V, C>,
}

impl<V: fmt::Display, C> fmt::Display for Dot<'_, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.graph;
        let directed = g.is_directed();
        let (keyword, arrow) = if directed {
            ("digraph", "->")
        } else {
            ("graph", "--")
        };

        // Numbers are handed out on first encounter; `seen` keeps that order for the labels.
        let mut number = vec![usize::MAX; g.id_bound()];
        let mut seen: Vec<VertexId> = Vec::with_capacity(g.id_bound());

        writeln!(f, "{keyword} {{")?;
        for from in g.vertex_ids() {
            let mut targets: Vec<VertexId> = g
                .successor_ids(from)
                .filter(|&to| directed || from <= to)
                .collect();
            if targets.is_empty() {
                continue;
            }
            targets.sort_unstable();

            write!(f, "  v{} {arrow} {{ ", number_of(&mut number, &mut seen, from))?;
            for (i, &to) in targets.iter().enumerate() {
                if i > 0 {
                    f.write_str("; ")?;
                }
                write!(f, "v{}", number_of(&mut number, &mut seen, to))?;
            }
            f.write_str(" }\n")?;
        }
        for id in g.vertex_ids() {
            if number[id] == usize::MAX {
                writeln!(f, "  v{}", number_of(&mut number, &mut seen, id))?;
            }
        }

        writeln!(f)?;
        for (n, &id) in seen.iter().enumerate() {
            let label = g.vertex_at(id).to_string().replace('"', "\\\"");
            writeln!(f, "  v{n} [label=\"{label}\"]")?;
        }
        f.write_str("}")
    }
}

fn number_of(number: &mut [usize], seen: &mut Vec<VertexId>, id: VertexId) -> usize {
    if number[id] == usize::MAX {
        number[id] = seen.len();
        seen.push(id);
    }
    number[id]
}

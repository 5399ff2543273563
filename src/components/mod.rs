pub mod explanation_panel;
pub mod roadmap_graph;
pub mod roadmap_list;

pub mod regions_page_template;

pub use regions_page_template::RegionsPageTemplate;

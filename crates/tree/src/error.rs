use thiserror::Error;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),
}

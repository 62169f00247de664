use crate::parse::tokenize;

use super::InputOptions;

pub(super) fn action(options: InputOptions) -> bool {
    let source = match options.source() {
        Ok(source) => source,
        Err(err) => {
            log::error!("could not read standard input: {}", err.msg);
            return false;
        }
    };

    let text = match source.read_content() {
        Ok(text) => text,
        Err(err) => {
            log::error!("could not read {}: {}", source.description(), err);
            return false;
        }
    };

    let mut clean = true;
    for tok in tokenize(&text) {
        if let Some(msg) = tok.ty.unexpected_message(&tok.text) {
            log::warn!("{}:{}: {}", source.description(), tok.span, msg);
            clean = false;
        }
        println!(
            "{:<8} {:<20} {:?}",
            tok.span.start.to_string(),
            format!("{:?}", tok.ty),
            tok.text
        );
    }
    clean
}

//! Prompt composition
//!
//! Author: hephaex@gmail.com

use injury_core::{FrequencyTable, Topic};

/// Build the instruction sent to the completion model.
///
/// The prompt embeds the frequency table verbatim, repeats the user's
/// question unchanged and pins the answer language to Brazilian Portuguese.
pub fn compose_prompt(data: &FrequencyTable, question: &str, topic: Topic) -> String {
    format!(
        "Utilize os dados do dataset de acidentes da OSHA e a seguinte informação: {data}, \
         para responder: {question}. \
         Forneça uma análise resumida em português brasileiro sobre {subject}. \
         Os resultados não devem ser mostrados em língua inglesa.",
        data = data.to_text(),
        subject = topic.subject(),
    )
}

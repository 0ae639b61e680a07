use crate::extraction::fragments::{Fragment, FragmentKind};

const SYSTEM_EXTRACTION: &str = include_str!("../../prompts/system_extraction.txt");

/// Build the system prompt for extraction.
pub fn build_system_prompt() -> &'static str {
    SYSTEM_EXTRACTION
}

/// Build the user prompt for one fragment of a document.
pub fn build_fragment_prompt(fragment: &Fragment, document_id: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!("Documento: {document_id}\n"));
    prompt.push_str(&format!("Fragmento: {}\n\n", fragment.kind.as_str()));
    prompt.push_str("<TEXTO>\n");
    prompt.push_str(&fragment.text);
    prompt.push_str("\n</TEXTO>\n\n");

    let instruction = match fragment.kind {
        FragmentKind::Preamble => {
            "Extrae solo el Decreto, el Año_publicación y el Título de este fragmento. \
             Devuelve {\"Decreto\": \"...\", \"Año_publicación\": año o null, \"Título\": \"...\"}."
        }
        FragmentKind::Normative => {
            "Extrae solo los capítulos y artículos permanentes de este fragmento, \
             con el encabezado de capítulo tal como aparece. Si el fragmento empieza \
             con artículos sin encabezado, usa el último encabezado que aparezca antes \
             o \"CAPÍTULO ÚNICO\" si no hay ninguno. Devuelve {\"Capítulos\": [...]}."
        }
        FragmentKind::Transitory => {
            "Extrae solo los artículos transitorios de este fragmento, agrupados por \
             bloque de transitorios. Devuelve {\"Transitorios\": [...]}."
        }
    };
    prompt.push_str(instruction);

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_not_empty() {
        assert!(build_system_prompt().contains("Capítulos"));
    }

    #[test]
    fn test_fragment_prompt_includes_text_and_keys() {
        let fragment = Fragment {
            kind: FragmentKind::Transitory,
            text: "TRANSITORIOS\nÚnico. Vigor.".into(),
        };
        let prompt = build_fragment_prompt(&fragment, "ley_de_amparo");
        assert!(prompt.contains("Documento: ley_de_amparo"));
        assert!(prompt.contains("Único. Vigor."));
        assert!(prompt.contains("{\"Transitorios\": [...]}"));
        assert!(!prompt.contains("Capítulos\": [...]"));
    }
}

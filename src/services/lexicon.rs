// Locale Lexicon
// One bundle per supported language: response-field labels, system-instruction
// headers, behavior defaults and user-facing messages.
//
// The same `FieldLabels` value feeds both the prompt builder and the response
// parser, so the labels the model is told to emit are the labels we look for.

use std::sync::OnceLock;

use crate::models::{
    Language, ModelConfig, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
};

/// Key tokens written in front of each `<label>: <value>` line of the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLabels {
    pub score: &'static str,
    pub assessment: &'static str,
    pub plagiarized_segments: &'static str,
    pub ai_score: &'static str,
    pub ai_assessment: &'static str,
    pub humanizing_suggestions: &'static str,
}

impl FieldLabels {
    pub fn all(&self) -> [&'static str; 6] {
        [
            self.score,
            self.assessment,
            self.plagiarized_segments,
            self.ai_score,
            self.ai_assessment,
            self.humanizing_suggestions,
        ]
    }
}

/// UI labels reused (upper-cased) as system-instruction section headers
#[derive(Debug, Clone)]
pub struct SectionHeaders {
    pub persona: &'static str,
    pub context: &'static str,
    pub memory: &'static str,
}

#[derive(Debug, Clone)]
pub struct BehaviorDefaults {
    pub persona: &'static str,
    pub context: &'static str,
    pub memory: &'static str,
}

#[derive(Debug, Clone)]
pub struct ErrorMessages {
    pub unsupported_doc: &'static str,
    pub unsupported_file_type: &'static str,
    pub processing_file: &'static str,
    pub text_required: &'static str,
    pub word_limit_exceeded: &'static str,
    pub assessment_failed: &'static str,
    pub invalid_api_key: &'static str,
    pub api_fail: &'static str,
    pub unknown: &'static str,
}

#[derive(Debug, Clone)]
pub struct ReportLabels {
    pub report_title: &'static str,
    pub plagiarism_title: &'static str,
    pub plagiarism_score_description: &'static str,
    pub score: &'static str,
    pub assessment: &'static str,
    pub analysis: &'static str,
    pub highlighted_segments: &'static str,
    pub sources: &'static str,
    pub ai_title: &'static str,
    pub ai_score_description: &'static str,
    pub ai_score: &'static str,
    pub ai_assessment: &'static str,
    pub ai_analysis: &'static str,
    pub suggestions_title: &'static str,
    pub suggestions_description: &'static str,
}

#[derive(Debug, Clone)]
pub struct LocaleLexicon {
    pub language: Language,
    /// Name of the language the model must answer in
    pub language_name: &'static str,
    pub labels: FieldLabels,
    pub headers: SectionHeaders,
    pub defaults: BehaviorDefaults,
    pub errors: ErrorMessages,
    pub report: ReportLabels,
}

static LEXICONS: OnceLock<[LocaleLexicon; 3]> = OnceLock::new();

impl LocaleLexicon {
    /// Lexicon for `language`; the registry is built once per process.
    pub fn get(language: Language) -> &'static LocaleLexicon {
        let all = LEXICONS.get_or_init(|| [portuguese(), english(), spanish()]);
        match language {
            Language::Pt => &all[0],
            Language::En => &all[1],
            Language::Es => &all[2],
        }
    }

    pub fn default_model_config(&self) -> ModelConfig {
        ModelConfig {
            persona: self.defaults.persona.to_string(),
            context: self.defaults.context.to_string(),
            memory: self.defaults.memory.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_k: DEFAULT_TOP_K,
            top_p: DEFAULT_TOP_P,
        }
    }
}

fn portuguese() -> LocaleLexicon {
    LocaleLexicon {
        language: Language::Pt,
        language_name: "Português do Brasil",
        labels: FieldLabels {
            score: "Pontuação de Plágio",
            assessment: "Avaliação Geral",
            plagiarized_segments: "Segmentos Plagiados",
            ai_score: "Pontuação de Geração por IA",
            ai_assessment: "Avaliação de IA",
            humanizing_suggestions: "Sugestões para Humanizar",
        },
        headers: SectionHeaders {
            persona: "Identidade (Persona)",
            context: "Contexto Global",
            memory: "Instruções Acumuladas",
        },
        defaults: BehaviorDefaults {
            persona: "Você é um especialista meticuloso em integridade acadêmica. Sua expertise abrange linguística forense, detecção de plágio e identificação de padrões em textos gerados por IA. Seu tom é objetivo, analítico e educacional, com o objetivo de ajudar os usuários a melhorar a originalidade de seus trabalhos.",
            context: "O objetivo principal é realizar uma dupla análise no texto enviado pelo usuário. Primeiro, conduza buscas extensivas na web para encontrar correspondências literais (verbatim) de plágio. Segundo, analise características linguísticas (como diversidade lexical, estrutura de sentenças e 'burstiness') para avaliar a probabilidade de geração por IA. A análise deve ser imparcial e baseada em evidências das buscas e do próprio texto.",
            memory: "Instruções geradas via feedback aparecerão aqui...",
        },
        errors: ErrorMessages {
            unsupported_doc: "Arquivos .doc não são suportados. Por favor, salve como .docx ou .pdf.",
            unsupported_file_type: "Tipo de arquivo não suportado: .{ext}",
            processing_file: "Ocorreu um erro ao processar o arquivo.",
            text_required: "Por favor, insira o texto a ser verificado.",
            word_limit_exceeded: "O texto inserido manualmente excede o limite de {maxWords} palavras.",
            assessment_failed: "Não foi possível determinar a avaliação.",
            invalid_api_key: "A chave de API fornecida é inválida ou expirou. Por favor, verifique sua chave e tente novamente.",
            api_fail: "Falha ao obter resposta da API. A resposta pode estar mal formatada ou a API indisponível. Tente novamente.",
            unknown: "Ocorreu um erro desconhecido.",
        },
        report: ReportLabels {
            report_title: "Relatório PlagAI Scanner",
            plagiarism_title: "Análise de Plágio",
            plagiarism_score_description: "Este score representa a porcentagem de similaridade do texto com fontes online.",
            score: "Pontuação de Plágio",
            assessment: "Avaliação Geral",
            analysis: "Análise Detalhada",
            highlighted_segments: "Segmentos com Similaridade Encontrada",
            sources: "Fontes Encontradas",
            ai_title: "Análise de Texto Gerado por IA",
            ai_score_description: "Este score representa a probabilidade de o texto ter sido gerado por uma IA.",
            ai_score: "Pontuação de Geração por IA",
            ai_assessment: "Avaliação de IA",
            ai_analysis: "Análise Detalhada da IA",
            suggestions_title: "Sugestões para Melhorar",
            suggestions_description: "A IA identificou algumas maneiras de tornar seu texto mais natural e envolvente:",
        },
    }
}

fn english() -> LocaleLexicon {
    LocaleLexicon {
        language: Language::En,
        language_name: "English",
        labels: FieldLabels {
            score: "Plagiarism Score",
            assessment: "Overall Assessment",
            plagiarized_segments: "Plagiarized Segments",
            ai_score: "AI-Generated Score",
            ai_assessment: "AI Assessment",
            humanizing_suggestions: "Humanizing Suggestions",
        },
        headers: SectionHeaders {
            persona: "Identity (Persona)",
            context: "Global Context",
            memory: "Accumulated Instructions",
        },
        defaults: BehaviorDefaults {
            persona: "You are a meticulous academic integrity expert. Your expertise lies in forensic linguistics, plagiarism detection, and identifying patterns in AI-generated text. Your tone is objective, analytical, and educational, aiming to help users improve the originality of their work.",
            context: "The primary goal is to perform a dual analysis on user-submitted text. First, conduct extensive web searches to find verbatim matches for plagiarism. Second, analyze linguistic features (like lexical diversity, sentence structure, and 'burstiness') to assess the probability of AI generation. The analysis must be impartial and based on evidence from the searches and the text itself.",
            memory: "Instructions generated via feedback will appear here...",
        },
        errors: ErrorMessages {
            unsupported_doc: ".doc files are not supported. Please save as .docx or .pdf.",
            unsupported_file_type: "Unsupported file type: .{ext}",
            processing_file: "An error occurred while processing the file.",
            text_required: "Please enter the text to be checked.",
            word_limit_exceeded: "Manually entered text exceeds the {maxWords} word limit.",
            assessment_failed: "Could not determine the assessment.",
            invalid_api_key: "The provided API key is invalid or has expired. Please check your key and try again.",
            api_fail: "Failed to get a response from the API. The response may be malformed or the API is unavailable. Please try again.",
            unknown: "An unknown error occurred.",
        },
        report: ReportLabels {
            report_title: "PlagAI Scanner Report",
            plagiarism_title: "Plagiarism Analysis",
            plagiarism_score_description: "This score represents the percentage of text similarity with online sources.",
            score: "Plagiarism Score",
            assessment: "Overall Assessment",
            analysis: "Detailed Analysis",
            highlighted_segments: "Segments with Found Similarity",
            sources: "Sources Found",
            ai_title: "AI-Generated Text Analysis",
            ai_score_description: "This score represents the likelihood that the text was generated by an AI.",
            ai_score: "AI-Generated Score",
            ai_assessment: "AI Assessment",
            ai_analysis: "Detailed AI Analysis",
            suggestions_title: "Suggestions for Improvement",
            suggestions_description: "The AI identified a few ways to make your text more natural and engaging:",
        },
    }
}

fn spanish() -> LocaleLexicon {
    LocaleLexicon {
        language: Language::Es,
        language_name: "Español",
        labels: FieldLabels {
            score: "Puntuación de Plagio",
            assessment: "Evaluación General",
            plagiarized_segments: "Segmentos Plagiados",
            ai_score: "Puntuación de Generación por IA",
            ai_assessment: "Evaluación de IA",
            humanizing_suggestions: "Sugerencias para Humanizar",
        },
        headers: SectionHeaders {
            persona: "Identidad (Persona)",
            context: "Contexto Global",
            memory: "Instrucciones Acumuladas",
        },
        defaults: BehaviorDefaults {
            persona: "Eres un meticuloso experto en integridad académica. Tu especialidad abarca la lingüística forense, la detección de plagio y la identificación de patrones en textos generados por IA. Tu tono es objetivo, analítico y educativo, con el fin de ayudar a los usuarios a mejorar la originalidad de sus trabajos.",
            context: "El objetivo principal es realizar un doble análisis en el texto enviado por el usuario. Primero, realiza búsquedas exhaustivas en la web para encontrar coincidencias literales (verbatim) de plagio. Segundo, analiza características lingüísticas (como diversidad léxica, estructura de las oraciones y 'burstiness') para evaluar la probabilidad de que haya sido generado por IA. El análisis debe ser imparcial y basarse en la evidencia de las búsquedas y del propio texto.",
            memory: "Las instrucciones generadas a través de comentarios aparecerán aquí...",
        },
        errors: ErrorMessages {
            unsupported_doc: "Los archivos .doc no son compatibles. Por favor, guarde como .docx o .pdf.",
            unsupported_file_type: "Tipo de archivo no compatible: .{ext}",
            processing_file: "Ocurrió un error al procesar el archivo.",
            text_required: "Por favor, ingrese el texto a verificar.",
            word_limit_exceeded: "El texto ingresado manualmente excede el límite de {maxWords} palabras.",
            assessment_failed: "No se pudo determinar la evaluación.",
            invalid_api_key: "La clave de API proporcionada no es válida o ha caducado. Por favor, verifique su clave e inténtelo de nuevo.",
            api_fail: "No se pudo obtener una respuesta de la API. La respuesta puede estar mal formada o la API no disponible. Inténtelo de nuevo.",
            unknown: "Ocurrió un error desconocido.",
        },
        report: ReportLabels {
            report_title: "Informe PlagAI Scanner",
            plagiarism_title: "Análisis de Plagio",
            plagiarism_score_description: "Este puntaje representa el porcentaje de similitud del texto con fuentes en línea.",
            score: "Puntuación de Plagio",
            assessment: "Evaluación General",
            analysis: "Análisis Detallado",
            highlighted_segments: "Segmentos con Similitud Encontrada",
            sources: "Fuentes Encontradas",
            ai_title: "Análisis de Texto Generado por IA",
            ai_score_description: "Este puntaje representa la probabilidad de que el texto haya sido generado por una IA.",
            ai_score: "Puntuación de Generación por IA",
            ai_assessment: "Evaluación de IA",
            ai_analysis: "Análisis Detallado de IA",
            suggestions_title: "Sugerencias para Mejorar",
            suggestions_description: "La IA ha identificado algunas formas de hacer su texto más natural y atractivo:",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_returns_matching_language() {
        for lang in Language::ALL {
            assert_eq!(LocaleLexicon::get(lang).language, lang);
        }
    }

    #[test]
    fn test_registry_is_built_once() {
        let a = LocaleLexicon::get(Language::En) as *const LocaleLexicon;
        let b = LocaleLexicon::get(Language::En) as *const LocaleLexicon;
        assert_eq!(a, b);
    }

    #[test]
    fn test_labels_are_unique_within_locale() {
        for lang in Language::ALL {
            let labels = LocaleLexicon::get(lang).labels.all();
            let unique: HashSet<_> = labels.iter().collect();
            assert_eq!(unique.len(), labels.len(), "duplicate label in {}", lang);
        }
    }

    #[test]
    fn test_default_model_config_uses_locale_behavior() {
        let es = LocaleLexicon::get(Language::Es);
        let cfg = es.default_model_config();
        assert!(cfg.persona.starts_with("Eres un meticuloso"));
        assert_eq!(cfg.top_k, DEFAULT_TOP_K);
    }
}

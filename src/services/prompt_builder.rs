// Prompt Builder
// Instruction prompt and system instruction for the analysis call

use crate::models::ModelConfig;

use super::lexicon::{FieldLabels, LocaleLexicon};
use super::response_parser::{
    AI_END, AI_START, PLAGIARISM_END, PLAGIARISM_START, SEGMENTS_END, SEGMENTS_START,
    SUGGESTIONS_END, SUGGESTIONS_START,
};

/// Task description sent ahead of the submitted text.
///
/// The description itself is fixed (Portuguese); the lexicon supplies the answer
/// language and the field labels the model must write in front of each value.
pub fn build_instruction_prompt(language_name: &str, labels: &FieldLabels) -> String {
    format!(
        r#"
Você é o "PlagAI Scanner", uma ferramenta especialista em integridade acadêmica e detecção de IA. Sua tarefa é realizar três análises profundas no texto fornecido: (1) detecção de plágio, (2) extração de segmentos plagiados, (3) detecção de conteúdo gerado por IA, e (4) fornecer sugestões de melhoria. Você DEVE responder INTEIRAMENTE no idioma: {lang}.

--- INÍCIO DAS INSTRUÇÕES ---

**TAREFA 1.A: ANÁLISE DE PLÁGIO (CRÍTICA)**

*   **FERRAMENTA OBRIGATÓRIA:** O uso da tool `googleSearch` é **OBRIGATÓRIO** e deve ser extensivo. **NÃO** gere uma resposta de plágio baseada apenas em seu conhecimento interno. Você deve buscar ativamente para confirmar ou descartar a originalidade.
*   **PROTOCOLO de BUSCA (Siga rigorosamente):**
    1.  **Impressão Digital (Fingerprinting):** Selecione de 3 a 5 frases longas e específicas de diferentes partes do texto (início, desenvolvimento, conclusão) e busque-as exatamente entre aspas.
    2.  **Conceitos Específicos:** Busque por combinações de palavras-chave ou sequências de palavras raras presentes no texto.
*   **AVALIAÇÃO DE RESULTADOS:**
    *   **Encontrado na Web:** Se o texto (ou partes significativas dele) for encontrado online em correspondências exatas (verbatim), isso é **PLÁGIO**.
    *   **Critério de Pontuação:** A pontuação de plágio DEVE refletir a quantidade de texto COPIADO VERBATIM de fontes externas. NÃO penalize por ideias ou estruturas similares se o texto for original. 100% (cópia integral), 60-99% (parágrafos inteiros), 20-59% (frases esparsas), 0% (nenhuma correspondência verbatim).
    *   **Atenção:** É inaceitável dar 0% se o texto for uma cópia da internet. Na dúvida, faça mais buscas.
*   **Formato de Saída (Plágio):** Use o formato ESTRITO abaixo, dentro dos marcadores.

{plagiarism_start}
{score}: [Um número de 0 a 100]
{assessment}: [Um resumo de uma frase]
---
Análise Detalhada:
[Siga ESTRITAMENTE estas 4 etapas:
1.  **Justificativa da Pontuação:** Explique CLARAMENTE por que deu essa pontuação, citando o que foi encontrado (ou não encontrado).
2.  **Fontes Detectadas:** Mencione genericamente onde o conteúdo foi encontrado (ex: "Encontrado em múltiplos sites acadêmicos").
3.  **Aviso de Precisão:** Adicione um aviso informando que a ferramenta é um auxílio.
4.  **Ações Recomendadas:** Sugira ações claras (ex: "Reescrever o conteúdo", "Adicionar citações").]
{plagiarism_end}

**TAREFA 1.B: EXTRAÇÃO DE SEGMENTOS (OBRIGATÓRIO)**

*   Se a pontuação de plágio for > 0, você DEVE extrair os trechos exatos do texto do usuário que correspondem às fontes online.
*   **Formato de Saída (Segmentos):** Use o formato ESTRITO abaixo. Separe CADA segmento com o delimitador '|||'. NÃO use quebras de linha.

{segments_start}
{segments}: [segmento 1 exato do texto do usuário]|||[outro segmento exato]|||[e assim por diante]
{segments_end}

**TAREFA 2: ANÁLISE DE CONTEÚDO GERADO POR IA**

*   **Objetivo:** Avaliar a probabilidade de o texto ter sido escrito por um modelo de linguagem de IA.
*   **Critérios:** Analise a **diversidade lexical** (uso repetitivo de palavras), a **"burstiness"** (variação no comprimento e estrutura das frases) e a presença de uma **voz autoral/pessoal**. Compare com padrões de LLMs (repetição de conectivos, falta de profundidade pessoal).
*   **Pontuação:** Probabilidade de ser gerado por IA (0 = humano, 100 = IA).
*   **Formato de Saída (IA):** Use o formato ESTRITO abaixo.

{ai_start}
{ai_score}: [Um número de 0 a 100]
{ai_assessment}: [Um resumo de uma frase]
---
Análise Detalhada da IA:
[Siga ESTRITAMENTE estas 3 etapas:
1.  **Justificativa da Pontuação:** Explique os fatores linguísticos que levaram à conclusão (ex: "O texto apresenta baixa 'burstiness' com sentenças de estrutura similar...").
2.  **Aviso de Precisão:** Adicione um aviso de que esta é uma análise probabilística.
3.  **Recomendação:** Sugira que o resultado seja usado como um indicador para revisão humana.]
{ai_end}

**TAREFA 3: SUGESTÕES DE HUMANIZAÇÃO (Se Score de IA > 50)**

*   Se a pontuação de IA for maior que 50, forneça de 2 a 3 sugestões práticas e acionáveis para "humanizar" o texto.
*   **Formato de Saída (Sugrestões):** Use o formato ESTRITO abaixo. Separe CADA sugestão com o delimitador '|||'. NÃO use quebras de linha. Se não houver sugestões, deixe a seção em branco.

{suggestions_start}
{suggestions}: [sugestão 1]|||[sugestão 2]|||[sugestão 3]
{suggestions_end}

--- FIM DAS INSTRUÇÕES ---

Agora, analise o seguinte texto:
---
"#,
        lang = language_name,
        score = labels.score,
        assessment = labels.assessment,
        segments = labels.plagiarized_segments,
        ai_score = labels.ai_score,
        ai_assessment = labels.ai_assessment,
        suggestions = labels.humanizing_suggestions,
        plagiarism_start = PLAGIARISM_START,
        plagiarism_end = PLAGIARISM_END,
        segments_start = SEGMENTS_START,
        segments_end = SEGMENTS_END,
        ai_start = AI_START,
        ai_end = AI_END,
        suggestions_start = SUGGESTIONS_START,
        suggestions_end = SUGGESTIONS_END,
    )
}

/// System instruction: persona, global context and accumulated memory, each under
/// an upper-cased header taken from the locale's UI labels.
pub fn build_system_instruction(lexicon: &LocaleLexicon, config: &ModelConfig) -> String {
    let headers = &lexicon.headers;
    format!(
        "# {}\n{}\n\n# {}\n{}\n\n# {}\n{}",
        headers.persona.to_uppercase(),
        config.persona,
        headers.context.to_uppercase(),
        config.context,
        headers.memory.to_uppercase(),
        config.memory,
    )
    .trim()
    .to_string()
}

/// Full user content: prompt body followed by the submitted text
pub fn build_request_text(prompt: &str, submitted_text: &str) -> String {
    format!("{}\n{}", prompt, submitted_text)
}

#[derive(Debug, Clone)]
pub struct PromptBundle {
    pub contents: String,
    pub system_instruction: String,
}

pub fn build_prompt_bundle(
    lexicon: &LocaleLexicon,
    config: &ModelConfig,
    submitted_text: &str,
) -> PromptBundle {
    let prompt = build_instruction_prompt(lexicon.language_name, &lexicon.labels);
    PromptBundle {
        contents: build_request_text(&prompt, submitted_text),
        system_instruction: build_system_instruction(lexicon, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use crate::services::response_parser::ResponseParser;
    use std::collections::HashSet;

    #[test]
    fn test_prompt_and_parser_share_label_set() {
        for lang in Language::ALL {
            let lexicon = LocaleLexicon::get(lang);
            let prompt = build_instruction_prompt(lexicon.language_name, &lexicon.labels);
            let parser = ResponseParser::new(&lexicon.labels);

            let parser_labels: HashSet<&str> = parser.anchors().into_iter().collect();
            let prompt_labels: HashSet<&str> = lexicon
                .labels
                .all()
                .into_iter()
                .filter(|label| prompt.contains(&format!("\n{}: ", label)))
                .collect();

            assert_eq!(prompt_labels, parser_labels, "label drift in {}", lang);
            assert_eq!(prompt_labels.len(), 6);
        }
    }

    #[test]
    fn test_prompt_contains_all_markers_unchanged_across_locales() {
        let markers = [
            "[PLAGIARISM_ANALYSIS_START]",
            "[PLAGIARISM_ANALYSIS_END]",
            "[PLAGIARIZED_SEGMENTS_START]",
            "[PLAGIARIZED_SEGMENTS_END]",
            "[AI_ANALYSIS_START]",
            "[AI_ANALYSIS_END]",
            "[HUMANIZING_SUGGESTIONS_START]",
            "[HUMANIZING_SUGGESTIONS_END]",
        ];
        for lang in Language::ALL {
            let lexicon = LocaleLexicon::get(lang);
            let prompt = build_instruction_prompt(lexicon.language_name, &lexicon.labels);
            for marker in markers {
                assert!(prompt.contains(marker), "{} missing in {}", marker, lang);
            }
            assert!(prompt.contains(&format!("idioma: {}.", lexicon.language_name)));
            assert!(prompt.contains("`googleSearch`"));
            assert!(prompt.ends_with("---\n"));
        }
    }

    #[test]
    fn test_system_instruction_sections_in_order() {
        let lexicon = LocaleLexicon::get(Language::En);
        let config = ModelConfig {
            persona: "Strict reviewer".to_string(),
            context: "Thesis chapter".to_string(),
            memory: "Ignore quotations".to_string(),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
        };
        let instruction = build_system_instruction(lexicon, &config);
        assert_eq!(
            instruction,
            "# IDENTITY (PERSONA)\nStrict reviewer\n\n# GLOBAL CONTEXT\nThesis chapter\n\n# ACCUMULATED INSTRUCTIONS\nIgnore quotations"
        );
    }

    #[test]
    fn test_system_instruction_uppercases_accented_headers() {
        let lexicon = LocaleLexicon::get(Language::Pt);
        let instruction = build_system_instruction(lexicon, &lexicon.default_model_config());
        assert!(instruction.starts_with("# IDENTIDADE (PERSONA)\n"));
        assert!(instruction.contains("\n# INSTRUÇÕES ACUMULADAS\n"));
    }

    #[test]
    fn test_request_text_appends_submitted_text() {
        let lexicon = LocaleLexicon::get(Language::Es);
        let bundle = build_prompt_bundle(lexicon, &lexicon.default_model_config(), "Hola mundo");
        assert!(bundle.contents.ends_with("---\n\nHola mundo"));
        assert!(bundle.contents.contains("Puntuación de Plagio: [Um número de 0 a 100]"));
    }
}

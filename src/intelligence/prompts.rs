// System instructions and user messages sent to the summarization service

use super::provider::AnalysisMode;

pub const GENERAL_SYSTEM_PROMPT: &str = "You are an assistant specialized in document analysis. \
You must provide two things: 1) a brief summary (preview) of 2-3 lines, \
2) a detailed analysis of the document covering its main points, insights and conclusions.";

pub const CONTRACT_SYSTEM_PROMPT: &str = r#"General instructions:
You are a legal assistant highly specialized in contract analysis. Your mission is to read the provided document carefully and produce a complete, critical and strategic analysis. Identify objective information, summarize clauses and point out risks, obligations and relevant rights.

Mandatory tasks:

Identify and highlight:
- Contract value (if any).
- Supplier / Contractor and Contracting party.
- Signature date and term of the contract.

Analyze every clause, summarizing it and highlighting:
- Obligations of each party.
- Deadlines for execution, deliveries and term.
- Penalties, fines and consequences of default.
- Termination and automatic renewal conditions.
- Warranties, liabilities and limitation of liability.
- Confidentiality, intellectual property and non-compete clauses (if applicable).

Identify critical information and legal risks, such as:
- Financial obligations that may impact cash flow.
- Excessive or disproportionate penalties.
- Ambiguous conditions that may lead to disputes.
- Clauses that favor one party in an unbalanced way.

Suggest questions or points of attention that should be reviewed before signing, including possible adjustments or negotiations.

Structured response format:

Contract value: [value or "Not provided"]
Supplier / Contractor: [name or "Not provided"]
Contracting party: [name or "Not provided"]
Signature date / Term: [dates or "Not provided"]
Detailed clause summary:
Clause 1 – [full summary, highlighting obligations, deadlines and risks]
Clause 2 – [same]
…
Risks and critical points:
[List points of attention, financial, legal or operational risks]
Strategic questions for contract review:
[Points that should be questioned or negotiated]
Additional useful information: [other notes affecting execution, compliance or contract management]

Special instructions:
- Analyze clause by clause, leave no detail out.
- Highlight values, dates, obligations and penalties with maximum attention.
- If any information is missing, state it explicitly as "Not provided".
- Be clear, objective and structured.
- Prioritize financial, legal and strategic risks, plus practical information for executing the contract."#;

pub const EXPLAIN_SYSTEM_PROMPT: &str = "You explain passages of documents in plain language. \
Answer in at most one short paragraph, using Markdown only for emphasis.";

pub fn system_prompt(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::General => GENERAL_SYSTEM_PROMPT,
        AnalysisMode::Contract => CONTRACT_SYSTEM_PROMPT,
    }
}

pub fn user_message(mode: AnalysisMode, filename: &str, text: &str) -> String {
    match mode {
        AnalysisMode::General => format!(
            "Analyze the following document \"{}\":\n\n{}\n\n\
             ALWAYS answer in plain text, never in JSON. Provide a brief summary (max. 2 lines) \
             and a detailed analysis, both in running text, clear, objective and concise. \
             Use Markdown to highlight titles and topics if needed.",
            filename, text
        ),
        AnalysisMode::Contract => {
            format!("Analyze the following contract: \"{}\"\n\n{}", filename, text)
        }
    }
}

pub fn explain_message(sentence: &str, context: &str) -> String {
    if context.trim().is_empty() {
        format!("Explain this sentence:\n\n\"{}\"", sentence)
    } else {
        format!(
            "Explain this sentence:\n\n\"{}\"\n\nIt comes from a document whose analysis is:\n\n{}",
            sentence, context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_mode_uses_legal_instructions() {
        let prompt = system_prompt(AnalysisMode::Contract);
        assert!(prompt.contains("Contract value"));
        assert!(prompt.contains("Risks and critical points"));
        assert_ne!(prompt, system_prompt(AnalysisMode::General));
    }

    #[test]
    fn test_user_message_includes_filename_and_text() {
        let msg = user_message(AnalysisMode::General, "report.pdf", "body text");
        assert!(msg.contains("\"report.pdf\""));
        assert!(msg.contains("body text"));

        let msg = user_message(AnalysisMode::Contract, "lease.pdf", "clauses");
        assert!(msg.starts_with("Analyze the following contract: \"lease.pdf\""));
    }

    #[test]
    fn test_explain_message_without_context() {
        let msg = explain_message("The sky is blue.", "  ");
        assert!(!msg.contains("analysis is"));
    }
}

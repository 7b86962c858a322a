//! Prompt texts for the generative backend.
//!
//! The extraction prompt carries the closed category/transaction-type
//! vocabularies and worked examples; the model is required to answer
//! with exactly one JSON object. The chat instruction block rides on top
//! of the RAG context and defines the note-creation action protocol and
//! the download-link convention.

/// Prompt for structured document extraction.
pub const EXTRACTION_PROMPT: &str = r#"You are a document data extraction expert. Analyze this document and extract ALL information.

Return ONLY valid JSON with no additional text or markdown.

The JSON must have these fields:
- "merchant": string (the business, company, employer, organization, or issuer name. For W-2s use the employer name. For tax forms use the issuing agency. NEVER leave this empty.)
- "amount": number (primary monetary value. For receipts/bills use the total. For pay stubs use net pay. For W-2s/1099s/informational docs use 0. For non-financial docs use 0.)
- "category": string - MUST be exactly one of: "Finance", "Health", "Personal", "Home", "Identity/Legal", "Career/School"
  - Finance: Pay stubs, tax papers (1040, 1099, W-2), receipts, bills, bank statements
  - Health: Lab results, appointments, prescriptions, insurance docs, medical records
  - Personal: Notes, journal entries, personal letters, photos
  - Home: Rent/mortgage contracts, car insurance, maintenance records, home repairs
  - Identity/Legal: IDs, licenses, birth certificates, passports, legal contracts
  - Career/School: Certifications, resume, work notes, diplomas, transcripts
- "transaction_type": string - MUST be exactly one of: "expense", "income", "record"
  - "expense": Bills, receipts (supermarket, Netflix, utilities, rent, any purchase or payment OUT)
  - "income": Pay stubs, deposits, refunds (money coming IN)
  - "record": Informational documents (W-2, 1099, contracts, IDs, medical results, certificates). Use amount 0 for records to avoid double-counting.
- "date": string (date in YYYY-MM-DD format. For W-2s use tax year end. Use today if unclear.)
- "due_date": string or null (due date for bills in YYYY-MM-DD, null otherwise)
- "summary": string (brief 1-2 sentence summary)
- "raw_text": string (COMPLETE transcription of ALL visible text. Include names, addresses, phone numbers, account numbers, dates, amounts, line items, etc.)

IMPORTANT: W-2s and 1099s are RECORDS, not income. Their amounts should be 0 to avoid double-counting with actual pay stubs.

Example for a W-2:
{"merchant":"Acme Corp","amount":0,"category":"Finance","transaction_type":"record","date":"2024-12-31","due_date":null,"summary":"W-2 from Acme Corp for tax year 2024, total wages $65,000.","raw_text":"Form W-2..."}

Example for a grocery receipt:
{"merchant":"Walmart","amount":47.53,"category":"Finance","transaction_type":"expense","date":"2025-01-15","due_date":null,"summary":"Groceries at Walmart including produce and dairy.","raw_text":"WALMART SUPERCENTER..."}

Example for a pay stub:
{"merchant":"Acme Corp","amount":2500.00,"category":"Finance","transaction_type":"income","date":"2025-01-31","due_date":null,"summary":"Bi-weekly pay stub from Acme Corp, net pay $2,500.","raw_text":"PAY STUB..."}"#;

/// Instruction block appended to the RAG context for conversational
/// requests.
const CHAT_INSTRUCTIONS: &str = r#"
=== INSTRUCTIONS ===
The user may:
1. Upload a document - you will receive the file inline. Process it and report what you extracted.
2. Ask questions about their stored documents - answer precisely using the document data above. Include specific details like addresses, names, amounts, dates, etc.
3. Request analytics - compute totals, comparisons, trends from the stored data. Remember: only expenses subtract, only income adds. Records (W-2s, 1099s, etc.) are informational only.
4. Create a note or reminder - if the user wants to save a note or set a reminder, respond with JSON:
   {"action":"create_note","content":"...note text...","reminder_date":"YYYY-MM-DD or null","reminder_time":"HH:MM or null"}
   Return ONLY the JSON when creating notes. Do not wrap it in markdown.

5. Request to download or view the original document - if the user asks to download, view, or get the original file for a document, include the download link in your response using this exact markdown format: [Download Original Document](FILE_URL) where FILE_URL is the Download URL from the document data above. Always include the download link when the user asks for the original file, receipt, document, or PDF.

For questions, answer naturally and precisely. If information exists in the document data, provide the exact details.
If information is not in any stored document, say so clearly.

User: "#;

/// Assemble the full conversational prompt: RAG context, instruction
/// block, then the user message.
pub fn build_chat_prompt(rag_context: &str, user_message: &str) -> String {
    format!("{}{}{}", rag_context, CHAT_INSTRUCTIONS, user_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_names_every_field() {
        for field in [
            "\"merchant\"",
            "\"amount\"",
            "\"category\"",
            "\"transaction_type\"",
            "\"date\"",
            "\"due_date\"",
            "\"summary\"",
            "\"raw_text\"",
        ] {
            assert!(EXTRACTION_PROMPT.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_extraction_prompt_carries_closed_vocabularies() {
        assert!(EXTRACTION_PROMPT.contains("\"Identity/Legal\""));
        assert!(EXTRACTION_PROMPT.contains("\"Career/School\""));
        assert!(EXTRACTION_PROMPT.contains("\"expense\", \"income\", \"record\""));
    }

    #[test]
    fn test_extraction_prompt_has_worked_examples() {
        assert!(EXTRACTION_PROMPT.contains("Example for a W-2:"));
        assert!(EXTRACTION_PROMPT.contains("Example for a grocery receipt:"));
        assert!(EXTRACTION_PROMPT.contains("Example for a pay stub:"));
    }

    #[test]
    fn test_chat_prompt_order() {
        let prompt = build_chat_prompt("CONTEXT BLOCK", "What did I spend at Walmart?");
        let ctx = prompt.find("CONTEXT BLOCK").unwrap();
        let instructions = prompt.find("=== INSTRUCTIONS ===").unwrap();
        let user = prompt.find("User: What did I spend at Walmart?").unwrap();
        assert!(ctx < instructions && instructions < user);
    }

    #[test]
    fn test_chat_prompt_defines_note_action_protocol() {
        let prompt = build_chat_prompt("", "");
        assert!(prompt.contains("\"action\":\"create_note\""));
        assert!(prompt.contains("[Download Original Document](FILE_URL)"));
    }
}

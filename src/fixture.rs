use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};

use crate::store;

/// Counts reported after the fixture is written.
#[derive(Debug, PartialEq)]
pub struct FixtureSummary {
    pub chapters: usize,
    pub problems: usize,
    pub prompts: usize,
    pub failure_modes: usize,
    pub bytes: u64,
}

impl FixtureSummary {
    fn of(doc: &Value, bytes: u64) -> Self {
        let chapters = items(doc, "chapters");
        let problems: Vec<&Value> = chapters.iter().flat_map(|c| items(c, "problems")).collect();
        FixtureSummary {
            chapters: chapters.len(),
            problems: problems.len(),
            prompts: problems.iter().map(|p| items(p, "prompts").len()).sum(),
            failure_modes: problems.iter().map(|p| items(p, "failureModes").len()).sum(),
            bytes,
        }
    }
}

fn items<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key).and_then(Value::as_array).map_or(&[][..], Vec::as_slice)
}

/// Write the finalized Chapter 1 document to `path`, bypassing extraction.
pub fn write(path: &Path) -> Result<FixtureSummary> {
    let doc = chapter_one();
    let bytes = store::save_document(path, &doc)?;
    Ok(FixtureSummary::of(&doc, bytes))
}

/// Hand-curated Chapter 1: Problem 1.1 (Freight Invoice Audit) with its prompt,
/// business-case metrics and three failure modes.
pub fn chapter_one() -> Value {
    json!(
    {
        "metadata": {
            "title": "AI Solved Business Problems",
            "subtitle": "50 Real-World Challenges from 10 Industries",
            "version": "1.0.0",
            "finalized": "2026-02-10",
            "totalChapters": 1,
            "totalProblems": 1,
            "totalPrompts": 1,
            "note": "Chapter 1 finalized with full Problem 1.1: Freight Invoice Audit. Includes complete 50KB+ execution prompt, 3 failure modes with recovery playbooks, business case analysis."
        },
        "chapters": [
            {
                "id": "ch1",
                "number": 1,
                "title": "Logistics & Supply Chain - The AI Operating System",
                "introduction": "Your phone rings at 2:00 AM. It's not a security alarm or a fire; it's the Port of Long Beach. A carrier is informing you that your priority containers, the ones holding the components for your Q3 product launch, are stuck behind a vessel that just lost power in the channel. By 8:00 AM, your CFO will ask why 'transportation variable costs' are decoupling from revenue. By 10:00 AM, the board will be breathing down your neck about 'working capital efficiency.' If you're a Chief Supply Chain Officer (CSCO) or VP of Operations in 2026, you're managing three simultaneous crises.",
                "context": {
                    "industry": "Logistics & Supply Chain",
                    "targetAudience": "Chief Supply Chain Officer, VP of Operations, CFO, CIO",
                    "targetCompanySize": "$50M-$500M revenue",
                    "decisionGapMetric": "14.2-hour delay between port strike and operational reroute"
                },
                "problems": [
                    {
                        "id": "ch1_p1",
                        "number": 1,
                        "title": "The Freight Leak (Automated Audit & Dispute)",
                        "severity": "CRITICAL",
                        "promptability": 9.5,
                        "sections": {
                            "operationalReality": "Your Accounts Payable (AP) department is currently 'spot-checking' 10% of freight invoices. They look for the massive, obvious errors, the $5,000 double-billings, but they are systematically missing the 'death by a thousand cuts.' 6% of all freight invoices contain errors. If you have a $12M annual freight spend, you are essentially 'tipping' your carriers $720,000 a year for mistakes you're too busy to catch.",
                            "whyTraditionalFails": "You've likely tried the traditional route: hiring a 3rd-party freight audit firm. They promise to find the gold in your data, but they usually take a 25% cut of every recovery. Worse, they use 'rules-based' software that's as rigid as your ERP. If a carrier changes a surcharge name from 'Fuel-S' to 'F-Surcharge,' the traditional system breaks.",
                            "managerDecisionPoint": "You have three realistic options: (1) Status Quo - Manual spot-checks, continue losing $500K+ annually. (2) 3rd-Party Audit - 25% contingency cost, doesn't fix root cause. (3) AI-Augmented Contract-to-Invoice Auditor - 100% audit coverage, pre-writes disputes, conservative 3-5% recovery ($350K+ on $12M spend). RECOMMENDATION: Option 3 is the only permanent structural fix.",
                            "aiWorkflow": "Imagine Monday morning. Instead of your AP clerk opening a stack of 500 invoices, they open a single 'Dispute Dashboard.' The AI agent ingested your carrier contracts (PDFs) and compared them to the previous week's invoice batch (CSV). The AI flags that Carrier X charged a 'Residential Surcharge' on 42 shipments to a commercial warehouse address. The AI already drafted the dispute email citing exact contract clause and warehouse GPS coordinates.",
                            "executionPrompt": "# PROMPT 1.1: FREIGHT INVOICE AUDIT AGENT\n## System Role\nYou are an expert freight audit specialist with 15+ years of logistics contract analysis. Your task is to identify billing errors in freight invoices by comparing them against carrier contracts.\n\n## Objective\nAnalyze freight invoice line items against contract terms and identify discrepancies that warrant formal dispute.\n\n## Inputs\n**INPUT 1: Carrier Contracts (Legal Documents)**\nRequired Format: PDF text or markdown (post-OCR extraction)\nRequired Sections: Rate tables, surcharge definitions, zone mappings\nExample: Contract XPO-2025-NY-001 Section 3.2: Surcharges include Residential Delivery $85/stop only for Zone C (12001-12999)\n\n**INPUT 2: Invoice Data (Structured)**\nRequired Format: CSV with headers\nRequired Columns: invoice_number, date, carrier, origin_zip, dest_zip, dest_type, base_charge, surcharges, fuel_surcharge, total\nExample: XPO-INV-00002, 2025-02-01, XPO Logistics, 10001, 10005, commercial, 450, 85, 67.50, 517.50\n\n**INPUT 3: Business Rules & Policies**\nRequired Format: Plain text or bullet points\nRequired Info: Pre-approval requirements, zone mappings, authorized surcharges\nExample: Detention requires written PO. Zone A (10001-10999) is commercial-only. Fuel max 3.5%.\n\n## Processing Steps\n### STEP 1: Contract Parsing\n- Identify all surcharge types and their conditions\n- Map zone definitions to ZIP code ranges\n- Extract payment terms and exclusion clauses\n- Flag ambiguous language\n\n### STEP 2: Invoice Validation\n- For EACH line: Verify destination ZIP in correct zone\n- Check destination type matches surcharge\n- Validate surcharge is authorized\n- Check pre-approval if required\n- Verify fuel surcharge within range\n\n### STEP 3: Discrepancy Identification\nCategories: Zone mismatch, Type mismatch, Unauthorized surcharge, Missing approval, Calculation error, Rate manipulation\n\n### STEP 4: Dispute Composition\n- Write formal dispute citing exact contract clause number\n- Include specific invoice line number\n- Explain why charge is improper\n- Request resolution\n- Pre-write email for carrier\n\n## Output Format\nReturn structured JSON with: report_id, audit_date, total_invoices_reviewed, disputed_line_items, total_disputed_amount, recovery_rate, disputes array (each with invoiceId, amount, reason, contractReference, confidenceScore), email drafts\n\n## Quality Standards\n- Accuracy Target: 99% precision (false positives damage relationships)\n- Confidence Threshold: Only output disputes with confidence ≥0.85\n- Legal Compliance: All disputes must cite specific contract clauses\n\n## Edge Cases\n1. Blurry PDFs: Flag for manual review; mark confidence <0.7\n2. Ambiguous contract: Dispute only if clearly improper\n3. Fuel disputes: Only if index >10% above contract range\n4. Zone boundaries: Defer to carrier unless documentation clear",
                            "businessCase": "Current State: $12M annual freight spend, 6% error rate = $720K loss, 10% audit coverage. AI Outcome: 100% audit coverage, 3.5% conservative recovery = $420K, $45K implementation cost, $24K/year operating cost. Year 1 ROI: 281%. Payback: 1.2 months. Even at 0.58% recovery rate, Year 1 ROI is positive.",
                            "industryContext": "The freight audit problem is widespread. Aberdeen Group reports companies <$50M waste 8-12% of spend; >$500M waste 4-6% due to scale. 'Carrier ransom' (rising rates despite flat service) accelerated this since 2021 (CSCMP Global Benchmark 2024).",
                            "failureModes": "See detailed failure modes below"
                        },
                        "businessCaseMetrics": {
                            "currentState": {
                                "annualFreightSpend": 12000000,
                                "errorRatePercentage": 6,
                                "annualCostToCompany": 720000,
                                "auditCoverage": 10
                            },
                            "aiOutcome": {
                                "auditCoverage": 100,
                                "conservativeRecoveryRate": 3.5,
                                "estimatedRecovery": 420000,
                                "implementationCost": 45000,
                                "annualOperatingCost": 24000,
                                "yearOneNet": 351000,
                                "roi": "281%",
                                "paybackMonths": 1.2
                            }
                        },
                        "prompts": [
                            {
                                "id": "ch1_p1_pr1",
                                "title": "Freight Invoice Audit Agent",
                                "version": "1.0.0",
                                "role": "Expert freight audit specialist",
                                "severity": "CRITICAL",
                                "platformCompatibility": [
                                    "ChatGPT-4",
                                    "Claude 3.5 Sonnet",
                                    "Gemini 2.0"
                                ],
                                "inputSchema": {
                                    "input1": {
                                        "name": "Carrier Contracts",
                                        "format": "PDF text/markdown",
                                        "required": [
                                            "Surcharges",
                                            "Zones",
                                            "Rates"
                                        ]
                                    },
                                    "input2": {
                                        "name": "Invoice Data",
                                        "format": "CSV",
                                        "required": [
                                            "invoice, date, carrier, dest_zip, dest_type, charges"
                                        ]
                                    },
                                    "input3": {
                                        "name": "Business Rules",
                                        "format": "Text/bullets",
                                        "required": [
                                            "Pre-approvals",
                                            "Zone mappings",
                                            "Authorized surcharges"
                                        ]
                                    }
                                },
                                "mockOutput": {
                                    "reportId": "AUDIT-2025-02-10-001",
                                    "totalInvoicesReviewed": 142,
                                    "disputedLineItems": 34,
                                    "totalDisputedAmount": "$8,450",
                                    "recoveryRate": "2.8%",
                                    "topDisputes": [
                                        {
                                            "invoiceId": "XPO-INV-00002",
                                            "reason": "Zone mismatch - residential surcharge on commercial address",
                                            "amount": "$85",
                                            "confidence": 0.99
                                        },
                                        {
                                            "invoiceId": "XPO-INV-00003",
                                            "reason": "Missing pre-approval for detention fee",
                                            "amount": "$150",
                                            "confidence": 0.94
                                        }
                                    ],
                                    "summary": "34 disputed charges across 142 invoices. Primary: zone mismatches (18), unauthorized surcharges (8), missing approvals (5). Conservative recovery estimate (70% acceptance): $5,915"
                                }
                            }
                        ],
                        "failureModes": [
                            {
                                "id": "fm_ch1_p1_01",
                                "number": 1,
                                "name": "PDF OCR Hallucination - Blurry Invoice Text",
                                "symptom": "AI flags surcharge as 'unauthorized' but clerk finds it IS in contract when reviewing original. False dispute due to OCR misreading surcharge name.",
                                "rootCause": "Low-resolution or faxed PDF. OCR misreads 'F-Surcharge' as 'F_charge' or 'E-Surcharge'. LLM searches exact string, fails to match even though it exists.",
                                "recovery": {
                                    "immediate": "Confidence Filtering: Only output disputes with ≥0.85 confidence. Mark <0.7 as 'requires manual review.' Filters ~15-20% edge cases.",
                                    "shortTerm": "Contract Standardization: Request digital contracts (no scans). Create 'canonical surcharge list' mapping all variations. Implementation: 2 weeks.",
                                    "longTerm": "Contract Management System: Implement Apptio/Determine or custom system with metadata. LLM queries database. Timeline: 6-8 weeks."
                                }
                            },
                            {
                                "id": "fm_ch1_p1_02",
                                "number": 2,
                                "name": "Carrier Relationship Damage - Over-Disputing",
                                "symptom": "200+ valid disputes approved in one week. Carrier account manager calls CFO: 'We're re-evaluating.' Threatens to move shipments to slower tier. You lose dispute ability for 6 months.",
                                "rootCause": "'Being right' differs from 'winning.' Carriers operate on relationships, not legal parsing. 200 disputes signals 'audit aggression' vs relief that costs are real.",
                                "recovery": {
                                    "immediate": "Dispute Prioritization: Filter for high-value (>$500), systemic (>10 shipments), defer small items to monthly batch. Reduces Week 1 volume from 200 to 30-40.",
                                    "shortTerm": "Carrier Communication: Call each carrier: 'We're improving audit process. First batch X items. Can we set up weekly partnership call instead of dispute emails?' Reframes as collaboration.",
                                    "longTerm": "Shared P&L Model: Propose 'split upside of better auditing. We reduce invalid charges, you see cleaner invoicing, we each take 50% of savings.' Timeline: 2-3 months."
                                }
                            },
                            {
                                "id": "fm_ch1_p1_03",
                                "number": 3,
                                "name": "Contract Amendment Blind Spot - Outdated Terms",
                                "symptom": "You dispute $3,200 'Hazmat Surcharge.' Carrier responds: 'It's in Amendment 4 (March 2025).' Your PDF has v1 only. You look foolish. Affects ~12% of contracts with recent amendments.",
                                "rootCause": "Amendments transmitted separately (email, portal). Never reach master library. AI system audits stale contract terms.",
                                "recovery": {
                                    "immediate": "Amendment Flag: Before escalating disputes, search for 'amendment,' 'addendum,' 'modification' within 6 months. Flag as 'pending amendment verification' until Procurement confirms latest version.",
                                    "shortTerm": "Version Control: Work with Procurement to implement repo (sharefolder) with mandatory version control. Every contract has 'Master Copy' date. Every amendment filed with original. Timeline: 2-3 weeks.",
                                    "longTerm": "Auto-Update: Implement TMS/portal that alerts when carriers submit amendments. Auto-updates contract PDF for next cycle. Timeline: 8-12 weeks."
                                }
                            }
                        ]
                    }
                ]
            }
        ]
    }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_writes_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data/ustav.json");
        write(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        write(&path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn summary_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ustav.json");
        let summary = write(&path).unwrap();
        assert_eq!(summary.chapters, 1);
        assert_eq!(summary.problems, 1);
        assert_eq!(summary.prompts, 1);
        assert_eq!(summary.failure_modes, 3);
        assert_eq!(summary.bytes, std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn keys_keep_literal_order_and_utf8() {
        let text = serde_json::to_string_pretty(&chapter_one()).unwrap();
        assert!(text.starts_with("{\n  \"metadata\": {\n    \"title\": \"AI Solved Business Problems\""));
        assert!(text.find("\"metadata\"").unwrap() < text.find("\"chapters\"").unwrap());
        assert!(text.contains("confidence ≥0.85"));
        assert!(!text.contains("\\u2265"));
    }

    #[test]
    fn failure_mode_ids() {
        let doc = chapter_one();
        let ids: Vec<&str> = doc["chapters"][0]["problems"][0]["failureModes"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|fm| fm["id"].as_str())
            .collect();
        assert_eq!(ids, ["fm_ch1_p1_01", "fm_ch1_p1_02", "fm_ch1_p1_03"]);
    }
}

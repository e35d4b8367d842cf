pub const TEXT_EXTRACTION_PROMPT: &str = "Extract all the text content from this PDF document. Return only the extracted text without any additional commentary.";

pub const QUERY_GENERATION_PROMPT: &str = "Generate {count} search queries that would help find similar content to this text. Each query should be focused on different aspects of the content. Return just the queries separated by newlines, without any additional text or numbering:

{text}";

pub const QUESTION_PAPER_PROMPT: &str = r#"You are an examination paper setter. Two PDF documents are attached.

## INPUTS

1. The first PDF is a previous-year question paper (PYQ). Use it to understand how each question is graded and the structure of the paper.
2. The second PDF is the syllabus. Every question you write must be strictly within it.

## STRUCTURE REQUIREMENTS

- Analyze the PYQ to determine the type of questions, their marks distribution, and the number of questions per chapter.
- Maintain the exact number of questions and total marks as in the PYQ. The total number of main questions must be EXACTLY equal to the number of main questions in the PYQ.
- Distribute marks in the same way and follow the same difficulty progression.
- Keep a balanced mix of easy, moderate, and difficult questions in the same ratio as the PYQ.
- Match the variety of question types in the PYQ, including proof-based, application-based, or conceptual questions.
- Follow the formatting of the PYQ exactly, including the number of sections, line breaks, indentation, bolding, and numbering.

## CONTENT REQUIREMENTS

- No two questions may test the same concept in different wording. Each question should introduce a unique aspect of the syllabus.
- Do not mention any brands, institutions, or names. Title the paper strictly as "<Subject name> Question Paper".
- Do not add explanations, answers, notes, or commentary.

## OUTPUT FORMAT

Reply with only the complete question paper and nothing else."#;

pub const CUSTOM_PROMPT_PREAMBLE: &str = "The user also supplied the following requirement for the question paper (for example, to include only specific chapters from the syllabus). If nothing important is mentioned, ignore it; otherwise take it into consideration when writing the paper:";

pub const PAPER_TITLE_PROMPT: &str = "Generate a title of at most three words for a question paper based on the following PDF file names. Extract as much information about the subject from the file names as possible. If the file names are just numbers or incoherent, return exactly: Question Paper. Return only the title.

File names:
{files}";

pub const PLAGIARISM_ANALYSIS_PROMPT: &str = r#"You are a plagiarism detection expert. Analyze the following text against the web search results and GitHub repositories to identify potential plagiarism.

## TEXT TO ANALYZE

{text}

## WEB SEARCH RESULTS

{web_results}

## GITHUB REPOSITORIES

{repository_results}
{additional_context}
## OUTPUT FORMAT

Provide a JSON response with the following structure:
{
  "overallSimilarity": (number between 0-100),
  "sources": [
    {
      "text": "the exact text from the document that appears to be plagiarized",
      "source": "name of the source website, document, or GitHub repository",
      "similarity": (number between 0-100 representing match percentage),
      "url": "URL of the source if available"
    }
  ]
}

The response must validate against this JSON Schema:
{schema}

## RULES

- Every similarity score, including overallSimilarity, must be between 0 and 100.
- For GitHub repositories, extract code snippets or descriptions that appear similar to the text.
- Focus on identifying specific matches rather than general topics.
- If nothing matches, return an overallSimilarity of 0 and an empty sources array.
- Return only the JSON with no additional text or explanation."#;

//! Prompt construction for the AI tier

use hakim_core::Category;
use std::fmt::Write;

const ROLE: &str = "أنت مساعد ذكي لنظام حكيم لإدارة شكاوى المواطنين في المملكة الأردنية الهاشمية.
مهمتك تحليل الشكاوى وتصنيفها ورفض البلاغات غير الصالحة.";

const REJECTION_POLICY: &str = "قواعد الرفض - يجب رفض الشكوى إذا:
1. احتوت على ألفاظ نابية أو إساءة
2. كانت غير مفهومة أو بلا معنى (سبام أو عبث)
3. كانت شكوى شخصية لا علاقة لها بالخدمات الحكومية
4. تعلقت بأمور سياسية أو طائفية
5. احتوت على معلومات كاذبة بشكل واضح
6. كانت طلب خدمة وليست شكوى (مثل: أريد معلومات عن...)
7. كانت مكررة أو قليلة الجهد (مثل: test, asdf, ههههه)

عند الرفض أرجع:
{
  \"rejected\": true,
  \"rejection_reason\": \"سبب الرفض بالعربية\",
  \"category_name\": \"\",
  \"priority\": \"low\",
  \"confidence\": 0.0,
  \"summary_ar\": \"\",
  \"sentiment\": \"neutral\"
}";

const IMAGE_INSTRUCTIONS: &str = "الصور المرفقة جزء من الشكوى، استخدمها لفهم المشكلة بشكل أدق:
- حدد نوع المشكلة الظاهرة في الصورة (تلف، تسرب، كسر، إلخ)
- قدّر مدى خطورة المشكلة بناءً على الصورة
- استعن بالمعلومات المرئية لتحسين دقة التصنيف والأولوية";

const RESPONSE_FORMAT: &str = "إذا كانت الشكوى صالحة فأجب بصيغة JSON فقط:
{
  \"rejected\": false,
  \"rejection_reason\": \"\",
  \"category_name\": \"اسم التصنيف بالإنجليزية\",
  \"priority\": \"low/medium/high/critical\",
  \"confidence\": 0.0-1.0,
  \"summary_ar\": \"ملخص قصير بالعربية (30 كلمة كحد أقصى)\",
  \"sentiment\": \"neutral/frustrated/angry/satisfied\",
  \"image_analysis\": \"وصف ما تم اكتشافه في الصور (إن وجدت)\"
}";

const PRIORITY_CRITERIA: &str = "معايير الأولوية:
- critical: خطر على الحياة، طوارئ، انقطاع خدمات حيوية عن منطقة كاملة
- high: مشاكل تؤثر على عدد كبير من الناس، أضرار مادية كبيرة، انقطاع طويل للخدمة
- medium: مشاكل عادية تحتاج معالجة في وقت معقول
- low: استفسارات بسيطة، اقتراحات، مشاكل ثانوية";

const JURISDICTION: &str =
    "ملاحظة: الجهات المتاحة هي الوزارات والهيئات الحكومية في المملكة الأردنية الهاشمية.";

/// Build the system instruction block
pub fn system_prompt(categories: &[Category], has_images: bool) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str(ROLE);
    prompt.push_str("\n\n");
    prompt.push_str(REJECTION_POLICY);
    prompt.push_str("\n\nالتصنيفات المتاحة:\n");
    prompt.push_str(&category_list(categories));

    if has_images {
        prompt.push('\n');
        prompt.push_str(IMAGE_INSTRUCTIONS);
        prompt.push('\n');
    }

    prompt.push('\n');
    prompt.push_str(RESPONSE_FORMAT);
    prompt.push_str("\n\n");
    prompt.push_str(PRIORITY_CRITERIA);
    prompt.push_str("\n\n");
    prompt.push_str(JURISDICTION);

    prompt
}

/// One `- localized (canonical)` line per category, in catalog order
pub fn category_list(categories: &[Category]) -> String {
    categories.iter().fold(String::new(), |mut list, category| {
        let _ = writeln!(list, "- {} ({})", category.name_localized, category.name);
        list
    })
}

/// Build the user-facing text of the complaint
pub fn user_prompt(title: &str, description: &str) -> String {
    format!("عنوان الشكوى: {}\n\nتفاصيل الشكوى: {}", title, description)
}

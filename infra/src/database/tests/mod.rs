mod otp_repository_tests;
